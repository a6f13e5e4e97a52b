use super::{CartItem, NewCartItem, ValidationError, ValidationResult};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MIN_PRICE: f64 = 0.0;
pub const MIN_CART_QUANTITY: u32 = 1;

// Titles and image URLs are free-form; only the fields the cart keys on or
// computes with are checked.
impl Validate for NewCartItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_item_id(&self.id)?;
        validate_price(self.price)?;
        Ok(())
    }
}

impl Validate for CartItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_item_id(&self.id)?;
        validate_price(self.price)?;
        validate_quantity(self.quantity)?;
        Ok(())
    }
}

/// Validate item id
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    if id.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "id".to_string(),
        });
    }

    Ok(())
}

/// Validate product price: any finite, non-negative number
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "price".to_string(),
            value: price.to_string(),
            reason: "Price must be a finite number".to_string(),
        });
    }

    if price < MIN_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: MIN_PRICE.to_string(),
            max: f64::MAX.to_string(),
            value: price.to_string(),
        });
    }

    Ok(())
}

/// Validate a stored quantity
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity < MIN_CART_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_CART_QUANTITY.to_string(),
            max: u32::MAX.to_string(),
            value: quantity.to_string(),
        });
    }

    Ok(())
}
