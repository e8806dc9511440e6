//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use order_core::domain::Customer;
use order_core::error::RepoError;
use order_core::ports::{CustomerRepository, OrderRepository, ProductRepository};

use super::entity::customer::{self, Entity as CustomerEntity};
use super::entity::order::Entity as OrderEntity;
use super::entity::product::Entity as ProductEntity;
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL customer repository.
pub type PostgresCustomerRepository = PostgresBaseRepository<CustomerEntity>;

/// PostgreSQL product repository.
pub type PostgresProductRepository = PostgresBaseRepository<ProductEntity>;

/// PostgreSQL order repository.
pub type PostgresOrderRepository = PostgresBaseRepository<OrderEntity>;

/// Keep the first character of the local part so logs stay free of PII.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepoError> {
        tracing::debug!(customer_email = %mask_email(email), "Finding customer by email");

        let result = CustomerEntity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

impl ProductRepository for PostgresProductRepository {}

impl OrderRepository for PostgresOrderRepository {}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
