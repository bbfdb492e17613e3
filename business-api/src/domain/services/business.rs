use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::domain::{
    ingestion::{
        generate_businesses, CancellationSignal, IngestionConfig, IngestionPipeline,
        IngestionReport,
    },
    models::{Business, BusinessId, BusinessListQuery, BusinessUpdate, NewBusiness, Page},
    ports::{
        inbound::BusinessService,
        outbound::{BusinessRepository, RepositoryError, StaffRepository},
    },
    BusinessError,
};

pub struct BusinessServiceImpl<B, S> {
    businesses: Arc<B>,
    staff: Arc<S>,
    ingestion: IngestionConfig,
}

impl<B, S> BusinessServiceImpl<B, S> {
    pub fn new(businesses: Arc<B>, staff: Arc<S>, ingestion: IngestionConfig) -> Self {
        Self {
            businesses,
            staff,
            ingestion,
        }
    }
}

fn repository_error(err: RepositoryError, id: Option<BusinessId>) -> BusinessError {
    match (err, id) {
        (RepositoryError::NotFound(_), Some(id)) => BusinessError::NotFound(id),
        (err, _) => BusinessError::Storage(err.to_string()),
    }
}

#[async_trait]
impl<B: BusinessRepository, S: StaffRepository> BusinessService for BusinessServiceImpl<B, S> {
    async fn create_business(&self, business: NewBusiness) -> Result<Business, BusinessError> {
        if business.name.trim().is_empty() {
            return Err(BusinessError::invalid("name is required"));
        }

        self.businesses
            .create(&business, None)
            .await
            .map_err(|e| repository_error(e, None))
    }

    #[instrument(skip_all, fields(total = self.ingestion.total))]
    async fn create_generated_businesses(
        &self,
        cancel: CancellationSignal,
    ) -> Result<IngestionReport, BusinessError> {
        let generated = generate_businesses(&mut rand::thread_rng(), self.ingestion.total);
        info!(count = generated.len(), "Generated synthetic businesses");

        let pipeline = IngestionPipeline::new(Arc::clone(&self.businesses), self.ingestion.clone());
        Ok(pipeline.run(generated, cancel).await)
    }

    async fn get_business(&self, id: BusinessId) -> Result<Business, BusinessError> {
        let mut business = self
            .businesses
            .get_one(id, None)
            .await
            .map_err(|e| repository_error(e, Some(id)))?;

        business.staffs = self
            .staff
            .list_by_business(id, None)
            .await
            .map_err(|e| repository_error(e, None))?;

        Ok(business)
    }

    async fn get_business_with_staffs(&self, id: BusinessId) -> Result<Business, BusinessError> {
        self.businesses
            .get_one_with_staffs(id, None)
            .await
            .map_err(|e| repository_error(e, Some(id)))
    }

    async fn list_businesses(
        &self,
        query: BusinessListQuery,
    ) -> Result<Page<Business>, BusinessError> {
        let mut page = self
            .businesses
            .list(&query, None)
            .await
            .map_err(|e| repository_error(e, None))?;

        for business in &mut page.data {
            business.staffs = self
                .staff
                .list_by_business(business.id, None)
                .await
                .map_err(|e| repository_error(e, None))?;
        }

        Ok(page)
    }

    async fn list_businesses_with_staffs(
        &self,
        query: BusinessListQuery,
    ) -> Result<Page<Business>, BusinessError> {
        self.businesses
            .list_with_staffs(&query, None)
            .await
            .map_err(|e| repository_error(e, None))
    }

    async fn update_business(
        &self,
        id: BusinessId,
        update: BusinessUpdate,
    ) -> Result<Business, BusinessError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(BusinessError::invalid("name must not be empty"));
        }

        let mut tx = self
            .businesses
            .begin()
            .await
            .map_err(|e| repository_error(e, None))?;

        let mut business = self
            .businesses
            .get_one(id, Some(&mut tx))
            .await
            .map_err(|e| repository_error(e, Some(id)))?;
        update.apply(&mut business);

        let updated = self
            .businesses
            .update(&business, Some(&mut tx))
            .await
            .map_err(|e| repository_error(e, Some(id)))?;

        self.businesses
            .commit(tx)
            .await
            .map_err(|e| repository_error(e, None))?;

        Ok(updated)
    }

    async fn delete_business(&self, id: BusinessId) -> Result<(), BusinessError> {
        self.businesses
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
        models::{NewStaff, PageRequest},
        StaffPassword,
    };

    type Service = BusinessServiceImpl<MockBusinessRepository, MockStaffRepository>;

    fn service(store: Arc<MockStore>, ingestion: IngestionConfig) -> Service {
        BusinessServiceImpl::new(
            Arc::new(MockBusinessRepository::new(Arc::clone(&store))),
            Arc::new(MockStaffRepository::new(store)),
            ingestion,
        )
    }

    fn acme() -> NewBusiness {
        NewBusiness {
            name: "Acme".to_string(),
            address: "1 Main St".to_string(),
            business_type: "type1".to_string(),
            status: "active".to_string(),
            ..Default::default()
        }
    }

    async fn add_staff(store: &Arc<MockStore>, business_id: BusinessId, username: &str) {
        MockStaffRepository::new(Arc::clone(store))
            .create(
                &NewStaff {
                    username: username.to_string(),
                    password: StaffPassword::hash("secret1"),
                    fullname: format!("{username} fullname"),
                    email: format!("{username}@example.com"),
                    role: "staff".to_string(),
                    business_id,
                },
                None,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let service = service(MockStore::new(), IngestionConfig::default());
        let err = service
            .create_business(NewBusiness::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BusinessError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn get_one_attaches_staff_in_both_variants() {
        let store = MockStore::new();
        let service = service(Arc::clone(&store), IngestionConfig::default());
        let created = service.create_business(acme()).await.unwrap();
        add_staff(&store, created.id, "ada").await;
        add_staff(&store, created.id, "grace").await;

        let v1 = service.get_business(created.id).await.unwrap();
        let v2 = service.get_business_with_staffs(created.id).await.unwrap();
        assert_eq!(v1.staffs.len(), 2);
        assert_eq!(v1, v2);
    }

    #[tokio::test]
    async fn missing_business_is_not_found() {
        let service = service(MockStore::new(), IngestionConfig::default());
        let id = BusinessId::new(Uuid::new_v4());

        assert!(matches!(
            service.get_business(id).await,
            Err(BusinessError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            service.update_business(id, BusinessUpdate::default()).await,
            Err(BusinessError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_business(id).await,
            Err(BusinessError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_copies_supplied_fields() {
        let service = service(MockStore::new(), IngestionConfig::default());
        let created = service.create_business(acme()).await.unwrap();

        let updated = service
            .update_business(
                created.id,
                BusinessUpdate {
                    status: Some("closed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, "closed");
        assert_eq!(updated.name, "Acme");
        assert_eq!(service.get_business(created.id).await.unwrap().status, "closed");
    }

    #[tokio::test]
    async fn delete_cascades_to_staff() {
        let store = MockStore::new();
        let service = service(Arc::clone(&store), IngestionConfig::default());
        let created = service.create_business(acme()).await.unwrap();
        add_staff(&store, created.id, "ada").await;

        service.delete_business(created.id).await.unwrap();
        assert!(store.staff().is_empty());
    }

    #[tokio::test]
    async fn list_filters_and_attaches_staff() {
        let store = MockStore::new();
        let service = service(Arc::clone(&store), IngestionConfig::default());
        let acme = service.create_business(acme()).await.unwrap();
        service
            .create_business(NewBusiness {
                name: "Globex".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        add_staff(&store, acme.id, "ada").await;

        let query = BusinessListQuery {
            name: Some("Acme".to_string()),
            page: PageRequest::default(),
            ..Default::default()
        };
        let page = service.list_businesses(query.clone()).await.unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].staffs.len(), 1);

        let preloaded = service.list_businesses_with_staffs(query).await.unwrap();
        assert_eq!(preloaded.data, page.data);
    }

    #[tokio::test]
    async fn generated_businesses_are_persisted_with_worker_labels() {
        let store = MockStore::new();
        let service = service(
            Arc::clone(&store),
            IngestionConfig {
                total: 95,
                workers: 4,
                batch_size: 10,
            },
        );

        let report = service
            .create_generated_businesses(CancellationSignal::never())
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.persisted(), 95);
        assert!(store
            .businesses()
            .iter()
            .all(|b| b.worker_name.starts_with("worker")));
    }
}
