//! In-memory business and staff repositories for tests.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{Arc, Mutex, RwLock};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{
    models::{
        Business, BusinessId, BusinessListQuery, ListSort, NewBusiness, NewStaff, Page,
        PageRequest, SortDirection, Staff, StaffId, StaffListQuery, StaffPageQuery,
    },
    ports::outbound::{BusinessRepository, RepositoryError, StaffRepository},
};

/// Rows shared between the mock repositories so staff can be joined onto businesses.
#[derive(Default)]
pub struct MockStore {
    businesses: RwLock<Vec<Business>>,
    staff: RwLock<Vec<Staff>>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn businesses(&self) -> Vec<Business> {
        self.businesses.read().unwrap().clone()
    }

    pub fn staff(&self) -> Vec<Staff> {
        self.staff.read().unwrap().clone()
    }

    fn staff_of(&self, id: BusinessId) -> Vec<Staff> {
        self.staff
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.business_id == id)
            .cloned()
            .collect()
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum InsertFault {
    #[default]
    None,
    Fail,
    Panic,
}

type BatchHook = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Clone)]
pub struct MockBusinessRepository {
    store: Arc<MockStore>,
    batches: Arc<Mutex<Vec<(String, usize)>>>,
    fault: InsertFault,
    after_batch: Option<BatchHook>,
}

#[allow(dead_code)]
impl MockBusinessRepository {
    pub fn new(store: Arc<MockStore>) -> Self {
        Self {
            store,
            batches: Arc::default(),
            fault: InsertFault::None,
            after_batch: None,
        }
    }

    /// Runs `hook` with the number of batches stored so far after every successful batch insert.
    pub fn after_batch(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.after_batch = Some(Arc::new(hook));
        self
    }

    /// Every batch insert returns a database error.
    pub fn failing_inserts(mut self) -> Self {
        self.fault = InsertFault::Fail;
        self
    }

    /// Every batch insert panics.
    pub fn panicking_inserts(mut self) -> Self {
        self.fault = InsertFault::Panic;
        self
    }

    pub fn with_businesses(self, businesses: Vec<Business>) -> Self {
        self.store.businesses.write().unwrap().extend(businesses);
        self
    }

    /// `(worker label, batch size)` for every successful batch insert.
    pub fn recorded_batches(&self) -> Vec<(String, usize)> {
        self.batches.lock().unwrap().clone()
    }

    fn insert(&self, new: &NewBusiness) -> Business {
        let business = Business {
            id: BusinessId::new(Uuid::new_v4()),
            name: new.name.clone(),
            description: new.description.clone(),
            address: new.address.clone(),
            business_type: new.business_type.clone(),
            status: new.status.clone(),
            created_at: OffsetDateTime::now_utc(),
            worker_name: new.worker_name.clone(),
            staffs: Vec::new(),
        };
        self.store.businesses.write().unwrap().push(business.clone());
        business
    }

    fn query(&self, query: &BusinessListQuery, with_staffs: bool) -> Page<Business> {
        let mut rows: Vec<Business> = self
            .store
            .businesses
            .read()
            .unwrap()
            .iter()
            .filter(|b| eq_opt(&query.name, &b.name))
            .filter(|b| eq_opt(&query.description, &b.description))
            .filter(|b| eq_opt(&query.address, &b.address))
            .filter(|b| eq_opt(&query.business_type, &b.business_type))
            .filter(|b| eq_opt(&query.status, &b.status))
            .filter(|b| eq_opt(&query.worker_name, &b.worker_name))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match query.sort.column {
                "name" => a.name.cmp(&b.name),
                "address" => a.address.cmp(&b.address),
                "business_type" => a.business_type.cmp(&b.business_type),
                "status" => a.status.cmp(&b.status),
                "worker_name" => a.worker_name.cmp(&b.worker_name),
                _ => a.created_at.cmp(&b.created_at),
            };
            directed(ordering, query.sort)
        });

        let total = rows.len() as i64;
        let data = paginate(rows, query.page)
            .into_iter()
            .map(|mut b| {
                if with_staffs {
                    b.staffs = self.store.staff_of(b.id);
                }
                b
            })
            .collect();

        Page::new(data, query.page, total)
    }
}

#[async_trait]
impl BusinessRepository for MockBusinessRepository {
    type Tx = ();

    async fn begin(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn commit(&self, _tx: ()) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create(
        &self,
        business: &NewBusiness,
        _tx: Option<&mut ()>,
    ) -> Result<Business, RepositoryError> {
        Ok(self.insert(business))
    }

    async fn create_batch(
        &self,
        businesses: &[NewBusiness],
        _tx: Option<&mut ()>,
    ) -> Result<Vec<Business>, RepositoryError> {
        match self.fault {
            InsertFault::Fail => {
                return Err(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut))
            }
            InsertFault::Panic => panic!("mock insert panic"),
            InsertFault::None => {}
        }

        let label = businesses
            .first()
            .map(|b| b.worker_name.clone())
            .unwrap_or_default();
        let stored = {
            let mut batches = self.batches.lock().unwrap();
            batches.push((label, businesses.len()));
            batches.len()
        };

        let rows = businesses.iter().map(|b| self.insert(b)).collect();
        if let Some(hook) = &self.after_batch {
            hook(stored);
        }
        Ok(rows)
    }

    async fn get_one(
        &self,
        id: BusinessId,
        _tx: Option<&mut ()>,
    ) -> Result<Business, RepositoryError> {
        self.store
            .businesses
            .read()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_one_with_staffs(
        &self,
        id: BusinessId,
        tx: Option<&mut ()>,
    ) -> Result<Business, RepositoryError> {
        let mut business = self.get_one(id, tx).await?;
        business.staffs = self.store.staff_of(id);
        Ok(business)
    }

    async fn update(
        &self,
        business: &Business,
        _tx: Option<&mut ()>,
    ) -> Result<Business, RepositoryError> {
        let mut rows = self.store.businesses.write().unwrap();
        let row = rows
            .iter_mut()
            .find(|b| b.id == business.id)
            .ok_or_else(|| RepositoryError::NotFound(business.id.to_string()))?;
        *row = Business {
            staffs: Vec::new(),
            ..business.clone()
        };
        Ok(row.clone())
    }

    async fn delete(&self, id: BusinessId, _tx: Option<&mut ()>) -> Result<(), RepositoryError> {
        let mut rows = self.store.businesses.write().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        self.store
            .staff
            .write()
            .unwrap()
            .retain(|s| s.business_id != id);
        Ok(())
    }

    async fn list(
        &self,
        query: &BusinessListQuery,
        _tx: Option<&mut ()>,
    ) -> Result<Page<Business>, RepositoryError> {
        Ok(self.query(query, false))
    }

    async fn list_with_staffs(
        &self,
        query: &BusinessListQuery,
        _tx: Option<&mut ()>,
    ) -> Result<Page<Business>, RepositoryError> {
        Ok(self.query(query, true))
    }
}

#[derive(Clone)]
pub struct MockStaffRepository {
    store: Arc<MockStore>,
}

impl MockStaffRepository {
    pub fn new(store: Arc<MockStore>) -> Self {
        Self { store }
    }

    fn sorted_page(&self, mut rows: Vec<Staff>, page: PageRequest, sort: ListSort) -> Page<Staff> {
        rows.sort_by(|a, b| {
            let ordering = match sort.column {
                "username" => a.username.cmp(&b.username),
                "fullname" => a.fullname.cmp(&b.fullname),
                "email" => a.email.cmp(&b.email),
                "role" => a.role.cmp(&b.role),
                _ => a.created_at.cmp(&b.created_at),
            };
            directed(ordering, sort)
        });
        let total = rows.len() as i64;
        Page::new(paginate(rows, page), page, total)
    }
}

#[async_trait]
impl StaffRepository for MockStaffRepository {
    type Tx = ();

    async fn begin(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn commit(&self, _tx: ()) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create(
        &self,
        staff: &NewStaff,
        _tx: Option<&mut ()>,
    ) -> Result<Staff, RepositoryError> {
        let businesses = self.store.businesses.read().unwrap();
        if !businesses.iter().any(|b| b.id == staff.business_id) {
            return Err(RepositoryError::Conflict(format!(
                "business {} does not exist",
                staff.business_id
            )));
        }

        let mut rows = self.store.staff.write().unwrap();
        if rows
            .iter()
            .any(|s| s.username == staff.username || s.email == staff.email)
        {
            return Err(RepositoryError::Conflict(
                "username or email already taken".to_string(),
            ));
        }

        let created = Staff {
            id: StaffId::new(Uuid::new_v4()),
            username: staff.username.clone(),
            password_hash: staff.password.as_ref().to_string(),
            fullname: staff.fullname.clone(),
            email: staff.email.clone(),
            role: staff.role.clone(),
            created_at: OffsetDateTime::now_utc(),
            business_id: staff.business_id,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn get_one(&self, id: StaffId, _tx: Option<&mut ()>) -> Result<Staff, RepositoryError> {
        self.store
            .staff
            .read()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn update(&self, staff: &Staff, _tx: Option<&mut ()>) -> Result<Staff, RepositoryError> {
        let mut rows = self.store.staff.write().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == staff.id)
            .ok_or_else(|| RepositoryError::NotFound(staff.id.to_string()))?;
        *row = staff.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: StaffId, _tx: Option<&mut ()>) -> Result<(), RepositoryError> {
        let mut rows = self.store.staff.write().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(
        &self,
        query: &StaffListQuery,
        _tx: Option<&mut ()>,
    ) -> Result<Page<Staff>, RepositoryError> {
        let rows = self
            .store
            .staff()
            .into_iter()
            .filter(|s| eq_opt(&query.username, &s.username))
            .filter(|s| eq_opt(&query.email, &s.email))
            .filter(|s| eq_opt(&query.role, &s.role))
            .filter(|s| query.business_id.map_or(true, |id| id == s.business_id))
            .collect();
        Ok(self.sorted_page(rows, query.page, query.sort))
    }

    async fn list_by_business(
        &self,
        business_id: BusinessId,
        _tx: Option<&mut ()>,
    ) -> Result<Vec<Staff>, RepositoryError> {
        Ok(self.store.staff_of(business_id))
    }

    async fn search_by_fullname(
        &self,
        query: &StaffPageQuery,
        _tx: Option<&mut ()>,
    ) -> Result<Page<Staff>, RepositoryError> {
        let keyword = query.keyword.as_deref().unwrap_or_default().to_lowercase();
        let rows = self
            .store
            .staff()
            .into_iter()
            .filter(|s| s.fullname.to_lowercase().contains(&keyword))
            .collect();
        Ok(self.sorted_page(rows, query.page, query.sort))
    }
}

fn eq_opt(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().map_or(true, |f| f == value)
}

fn directed(ordering: Ordering, sort: ListSort) -> Ordering {
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn paginate<T>(rows: Vec<T>, page: PageRequest) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}
