//! Client registration and maintenance.

use crate::db::repository::FullRepository;
use crate::models::{Client, ClientId, ClientUpdate, NewClient};

use super::{ServiceError, ServiceResult};

/// Register a client after field-shape validation. Email uniqueness is
/// enforced by the repository and surfaces as a conflict error.
pub async fn create_client(repo: &dyn FullRepository, new: NewClient) -> ServiceResult<Client> {
    new.validate().map_err(ServiceError::Validation)?;
    Ok(repo.store_client(new).await?)
}

pub async fn get_client(repo: &dyn FullRepository, id: ClientId) -> ServiceResult<Client> {
    Ok(repo.fetch_client(id).await?)
}

pub async fn list_clients(repo: &dyn FullRepository) -> ServiceResult<Vec<Client>> {
    Ok(repo.fetch_clients().await?)
}

/// Apply a partial update over the stored fields and persist the result.
pub async fn update_client(
    repo: &dyn FullRepository,
    id: ClientId,
    update: ClientUpdate,
) -> ServiceResult<Client> {
    let current = repo.fetch_client(id).await?;
    let merged = current.fields().merged(&update);
    merged.validate().map_err(ServiceError::Validation)?;
    Ok(repo.update_client(id, merged).await?)
}

/// Remove a client. Blocked while reservations still reference them.
pub async fn delete_client(repo: &dyn FullRepository, id: ClientId) -> ServiceResult<()> {
    Ok(repo.delete_client(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    fn draft(email: &str) -> NewClient {
        NewClient {
            first_name: "Marta".to_string(),
            last_name: "Gimenez".to_string(),
            phone: "1144556677".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_bad_fields() {
        let repo = LocalRepository::new();
        let mut new = draft("marta@example.com");
        new.phone = "123".to_string();
        let err = create_client(&repo, new).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_merges_and_revalidates() {
        let repo = LocalRepository::new();
        let client = create_client(&repo, draft("marta@example.com"))
            .await
            .unwrap();

        let updated = update_client(
            &repo,
            client.id,
            ClientUpdate {
                phone: Some("1199887766".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.phone, "1199887766");
        assert_eq!(updated.email, client.email);

        let err = update_client(
            &repo,
            client.id,
            ClientUpdate {
                email: Some("not-an-email".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_email_surfaces_as_repository_conflict() {
        let repo = LocalRepository::new();
        create_client(&repo, draft("same@example.com")).await.unwrap();
        let err = create_client(&repo, draft("SAME@example.com"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Repository(e) => assert!(e.is_conflict()),
            other => panic!("expected repository conflict, got {other:?}"),
        }
    }
}
