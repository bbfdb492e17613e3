use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    models::{
        NewStaff, Page, Staff, StaffId, StaffListQuery, StaffPageQuery, StaffRegistration,
        StaffUpdate,
    },
    ports::{
        inbound::StaffService,
        outbound::{RepositoryError, StaffRepository},
    },
    Email, EmailError, StaffError, StaffPassword,
};

const MIN_PASSWORD_LEN: usize = 6;

pub struct StaffServiceImpl<R> {
    repository: Arc<R>,
}

impl<R> StaffServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn repository_error(err: RepositoryError, id: Option<StaffId>) -> StaffError {
    match (err, id) {
        (RepositoryError::NotFound(_), Some(id)) => StaffError::NotFound(id),
        (RepositoryError::Conflict(message), _) => StaffError::Conflict(message),
        (err, _) => StaffError::Storage(err.to_string()),
    }
}

impl From<EmailError> for StaffError {
    fn from(err: EmailError) -> Self {
        StaffError::InvalidInput(err.to_string())
    }
}

fn validate(registration: &StaffRegistration) -> Result<Email, StaffError> {
    let required = [
        ("username", &registration.username),
        ("password", &registration.password),
        ("fullname", &registration.fullname),
        ("email", &registration.email),
        ("role", &registration.role),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(StaffError::invalid(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }
    if registration.business_id.is_none() {
        return Err(StaffError::invalid("missing required fields: business_id"));
    }
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StaffError::invalid(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(Email::try_from(registration.email.trim())?)
}

fn validate_update(update: &StaffUpdate) -> Result<(), StaffError> {
    for (field, value) in [
        ("username", &update.username),
        ("fullname", &update.fullname),
        ("role", &update.role),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(StaffError::invalid(format!("{field} must not be empty")));
        }
    }
    if let Some(email) = update.email.as_deref() {
        Email::try_from(email.trim())?;
    }
    Ok(())
}

#[async_trait]
impl<R: StaffRepository> StaffService for StaffServiceImpl<R> {
    async fn create_staff(&self, registration: StaffRegistration) -> Result<Staff, StaffError> {
        let email = validate(&registration)?;
        let Some(business_id) = registration.business_id else {
            return Err(StaffError::invalid("missing required fields: business_id"));
        };

        let staff = NewStaff {
            username: registration.username.trim().to_string(),
            password: StaffPassword::hash(&registration.password),
            fullname: registration.fullname.trim().to_string(),
            email: email.into(),
            role: registration.role.trim().to_string(),
            business_id,
        };

        self.repository
            .create(&staff, None)
            .await
            .map_err(|e| repository_error(e, None))
    }

    async fn get_staff(&self, id: StaffId) -> Result<Staff, StaffError> {
        self.repository
            .get_one(id, None)
            .await
            .map_err(|e| repository_error(e, Some(id)))
    }

    async fn list_staff(&self, query: StaffListQuery) -> Result<Page<Staff>, StaffError> {
        self.repository
            .list(&query, None)
            .await
            .map_err(|e| repository_error(e, None))
    }

    async fn search_staff(&self, query: StaffPageQuery) -> Result<Page<Staff>, StaffError> {
        self.repository
            .search_by_fullname(&query, None)
            .await
            .map_err(|e| repository_error(e, None))
    }

    async fn update_staff(&self, id: StaffId, update: StaffUpdate) -> Result<Staff, StaffError> {
        validate_update(&update)?;

        let mut tx = self
            .repository
            .begin()
            .await
            .map_err(|e| repository_error(e, None))?;

        let mut staff = self
            .repository
            .get_one(id, Some(&mut tx))
            .await
            .map_err(|e| repository_error(e, Some(id)))?;
        update.apply(&mut staff);

        let updated = self
            .repository
            .update(&staff, Some(&mut tx))
            .await
            .map_err(|e| repository_error(e, Some(id)))?;

        self.repository
            .commit(tx)
            .await
            .map_err(|e| repository_error(e, None))?;

        Ok(updated)
    }

    async fn delete_staff(&self, id: StaffId) -> Result<(), StaffError> {
        self.repository
            .delete(id, None)
            .await
            .map_err(|e| repository_error(e, Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::adapters::outbound::mock::{MockBusinessRepository, MockStaffRepository, MockStore};
    use crate::domain::{
        models::{BusinessId, NewBusiness, PageRequest},
        ports::outbound::BusinessRepository,
    };

    async fn setup() -> (StaffServiceImpl<MockStaffRepository>, BusinessId) {
        let store = MockStore::new();
        let business = MockBusinessRepository::new(Arc::clone(&store))
            .create(
                &NewBusiness {
                    name: "Acme".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        let service = StaffServiceImpl::new(Arc::new(MockStaffRepository::new(store)));
        (service, business.id)
    }

    fn registration(username: &str, business_id: BusinessId) -> StaffRegistration {
        StaffRegistration {
            username: username.to_string(),
            password: "secret1".to_string(),
            fullname: format!("{username} Lovelace"),
            email: format!("{username}@example.com"),
            role: "owner".to_string(),
            business_id: Some(business_id),
        }
    }

    #[tokio::test]
    async fn invalid_email_reason_reaches_the_caller() {
        let (service, business_id) = setup().await;
        let mut bad_email = registration("ada", business_id);
        bad_email.email = "ada@example".to_string();

        let Err(StaffError::InvalidInput(message)) = service.create_staff(bad_email).await else {
            panic!("expected invalid input");
        };
        assert!(message.contains("invalid domain part"), "{message}");

        let err = service
            .update_staff(
                StaffId::new(Uuid::new_v4()),
                StaffUpdate {
                    email: Some("@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing local part"), "{err}");
    }

    #[tokio::test]
    async fn create_hashes_password_and_never_serializes_it() {
        let (service, business_id) = setup().await;
        let staff = service
            .create_staff(registration("ada", business_id))
            .await
            .unwrap();

        assert!(StaffPassword::from_hash(staff.password_hash.clone()).verify("secret1"));
        let json = serde_json::to_value(&staff).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["businessId"], business_id.to_string());
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let (service, business_id) = setup().await;

        let mut short = registration("ada", business_id);
        short.password = "12345".to_string();
        let mut missing = registration("ada", business_id);
        missing.fullname = " ".to_string();
        let mut bad_email = registration("ada", business_id);
        bad_email.email = "not-an-email".to_string();
        let mut no_business = registration("ada", business_id);
        no_business.business_id = None;

        for invalid in [short, missing, bad_email, no_business] {
            assert!(matches!(
                service.create_staff(invalid).await,
                Err(StaffError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let (service, business_id) = setup().await;
        service
            .create_staff(registration("ada", business_id))
            .await
            .unwrap();

        let mut duplicate = registration("ada", business_id);
        duplicate.email = "other@example.com".to_string();
        assert!(matches!(
            service.create_staff(duplicate).await,
            Err(StaffError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn keyword_search_is_case_insensitive_substring() {
        let (service, business_id) = setup().await;
        service
            .create_staff(registration("ada", business_id))
            .await
            .unwrap();
        service
            .create_staff(StaffRegistration {
                fullname: "Grace Hopper".to_string(),
                ..registration("grace", business_id)
            })
            .await
            .unwrap();

        let page = service
            .search_staff(StaffPageQuery {
                keyword: Some("LOVE".to_string()),
                page: PageRequest::default(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].username, "ada");
    }

    #[tokio::test]
    async fn update_and_delete() {
        let (service, business_id) = setup().await;
        let staff = service
            .create_staff(registration("ada", business_id))
            .await
            .unwrap();

        let updated = service
            .update_staff(
                staff.id,
                StaffUpdate {
                    role: Some("manager".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, "manager");
        assert_eq!(updated.email, "ada@example.com");

        service.delete_staff(staff.id).await.unwrap();
        assert!(matches!(
            service.get_staff(staff.id).await,
            Err(StaffError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_staff(StaffId::new(Uuid::new_v4())).await,
            Err(StaffError::NotFound(_))
        ));
    }
}
