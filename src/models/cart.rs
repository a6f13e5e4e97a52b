use serde::{Deserialize, Serialize};

/// Individual line item in the shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

/// Product details supplied when adding to the cart; quantity is owned by the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

/// A single cart mutation, kept so it can be replayed onto a restored cart
#[derive(Debug, Clone, PartialEq)]
pub enum CartOperation {
    Add(NewCartItem),
    Increment(String),
    Decrement(String),
}

/// Ordered shopping cart, unique by item id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl NewCartItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

impl CartOperation {
    /// Operation name used in logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            CartOperation::Add(_) => "add_to_cart",
            CartOperation::Increment(_) => "increment",
            CartOperation::Decrement(_) => "decrement",
        }
    }

    /// Id of the item the operation targets
    pub fn item_id(&self) -> &str {
        match self {
            CartOperation::Add(item) => &item.id,
            CartOperation::Increment(id) | CartOperation::Decrement(id) => id,
        }
    }
}

impl Cart {
    /// Create a new empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored items. Later duplicates of an id are dropped.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if !cart.contains_item(&item.id) {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Add a product, or bump its quantity if it is already in the cart
    pub fn add(&mut self, item: NewCartItem) -> bool {
        if self.contains_item(&item.id) {
            return self.increment(&item.id);
        }
        self.items.push(item.into_cart_item());
        true
    }

    /// Increase the quantity of an item by one. Unknown ids are ignored.
    pub fn increment(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => match item.quantity.checked_add(1) {
                Some(quantity) => {
                    item.quantity = quantity;
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Decrease the quantity of an item by one, never going below 1
    pub fn decrement(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.quantity > 1 => {
                item.quantity -= 1;
                true
            }
            _ => false,
        }
    }

    /// Apply an operation, returning whether the cart changed
    pub fn apply(&mut self, operation: &CartOperation) -> bool {
        match operation {
            CartOperation::Add(item) => self.add(item.clone()),
            CartOperation::Increment(id) => self.increment(id),
            CartOperation::Decrement(id) => self.decrement(id),
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    pub fn get_item(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Number of distinct line items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all line items
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
