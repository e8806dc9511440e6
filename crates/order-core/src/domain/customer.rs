use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer entity.
///
/// `password_hash` is only present for customers that registered through the
/// auth endpoints and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
}

impl Customer {
    /// Create a new customer with a generated ID.
    pub fn new(name: String, email: String, phone: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            password_hash: None,
        }
    }

    pub fn with_password_hash(mut self, hash: String) -> Self {
        self.password_hash = Some(hash);
        self
    }
}

/// Fields accepted when creating or updating a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl Customer {
    /// Apply a partial update; empty strings keep the current value.
    pub fn apply(&mut self, input: CustomerInput) {
        if !input.name.is_empty() {
            self.name = input.name;
        }
        if !input.email.is_empty() {
            self.email = input.email;
        }
        if !input.phone.is_empty() {
            self.phone = input.phone;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_skips_empty_fields() {
        let mut customer = Customer::new("Ann".into(), "ann@example.com".into(), "555".into());

        customer.apply(CustomerInput {
            name: String::new(),
            email: "ann@new.example.com".into(),
            phone: String::new(),
        });

        assert_eq!(customer.name, "Ann");
        assert_eq!(customer.email, "ann@new.example.com");
        assert_eq!(customer.phone, "555");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let customer = Customer::new("Ann".into(), "ann@example.com".into(), "555".into())
            .with_password_hash("secret-hash".into());

        let json = serde_json::to_string(&customer).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
