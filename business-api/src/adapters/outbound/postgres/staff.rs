use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::{
    bounded, classify,
    rows::{StaffRow, STAFF_COLUMNS},
    PgTx,
};
use crate::domain::{
    models::{
        BusinessId, ListSort, NewStaff, Page, PageRequest, Staff, StaffId, StaffListQuery,
        StaffPageQuery,
    },
    ports::outbound::{RepositoryError, StaffRepository},
};

pub struct PostgresStaffRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresStaffRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

async fn insert_staff(
    conn: &mut PgConnection,
    staff: &NewStaff,
) -> Result<StaffRow, RepositoryError> {
    sqlx::query_as::<_, StaffRow>(&format!(
        r#"
        INSERT INTO staff (username, password, fullname, email, role, business_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {STAFF_COLUMNS}
        "#
    ))
    .bind(&staff.username)
    .bind(staff.password.as_ref())
    .bind(&staff.fullname)
    .bind(&staff.email)
    .bind(&staff.role)
    .bind(staff.business_id.as_uuid())
    .fetch_one(conn)
    .await
    .map_err(classify)
}

async fn fetch_staff(
    conn: &mut PgConnection,
    id: StaffId,
) -> Result<Option<StaffRow>, RepositoryError> {
    Ok(sqlx::query_as::<_, StaffRow>(&format!(
        "SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1"
    ))
    .bind(id.as_uuid())
    .fetch_optional(conn)
    .await?)
}

async fn update_staff(
    conn: &mut PgConnection,
    staff: &Staff,
) -> Result<Option<StaffRow>, RepositoryError> {
    sqlx::query_as::<_, StaffRow>(&format!(
        r#"
        UPDATE staff
        SET username = $2, fullname = $3, email = $4, role = $5, business_id = $6
        WHERE id = $1
        RETURNING {STAFF_COLUMNS}
        "#
    ))
    .bind(staff.id.as_uuid())
    .bind(&staff.username)
    .bind(&staff.fullname)
    .bind(&staff.email)
    .bind(&staff.role)
    .bind(staff.business_id.as_uuid())
    .fetch_optional(conn)
    .await
    .map_err(classify)
}

async fn delete_staff(conn: &mut PgConnection, id: StaffId) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM staff WHERE id = $1")
        .bind(id.as_uuid())
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

async fn staff_of_business(
    conn: &mut PgConnection,
    business_id: BusinessId,
) -> Result<Vec<Staff>, RepositoryError> {
    let rows = sqlx::query_as::<_, StaffRow>(&format!(
        "SELECT {STAFF_COLUMNS} FROM staff WHERE business_id = $1 ORDER BY created_at"
    ))
    .bind(business_id.as_uuid())
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Staff::from).collect())
}

/// A staff filter as rendered into SQL.
enum Condition {
    Equals(&'static str, String),
    EqualsId(&'static str, uuid::Uuid),
    Contains(&'static str, String),
}

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, conditions: &[Condition]) {
    for (i, condition) in conditions.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match condition {
            Condition::Equals(column, value) => {
                builder.push(*column).push(" = ").push_bind(value.clone());
            }
            Condition::EqualsId(column, value) => {
                builder.push(*column).push(" = ").push_bind(*value);
            }
            Condition::Contains(column, value) => {
                builder
                    .push(*column)
                    .push(" ILIKE '%' || ")
                    .push_bind(value.clone())
                    .push(" || '%'");
            }
        }
    }
}

async fn select_page(
    conn: &mut PgConnection,
    conditions: &[Condition],
    page: PageRequest,
    sort: ListSort,
) -> Result<Page<Staff>, RepositoryError> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM staff");
    push_conditions(&mut count, conditions);
    let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

    let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {STAFF_COLUMNS} FROM staff"));
    push_conditions(&mut select, conditions);
    select.push(format!(" ORDER BY {} {}, id", sort.column, sort.direction));
    select
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = select
        .build_query_as::<StaffRow>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(Page::new(
        rows.into_iter().map(Staff::from).collect(),
        page,
        total,
    ))
}

fn list_conditions(query: &StaffListQuery) -> Vec<Condition> {
    let mut conditions = Vec::new();
    for (column, value) in [
        ("username", &query.username),
        ("email", &query.email),
        ("role", &query.role),
    ] {
        if let Some(value) = value {
            conditions.push(Condition::Equals(column, value.clone()));
        }
    }
    if let Some(business_id) = query.business_id {
        conditions.push(Condition::EqualsId("business_id", business_id.as_uuid()));
    }
    conditions
}

fn keyword_conditions(query: &StaffPageQuery) -> Vec<Condition> {
    query
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| vec![Condition::Contains("fullname", k.to_string())])
        .unwrap_or_default()
}

fn not_found(id: StaffId) -> RepositoryError {
    RepositoryError::NotFound(format!("staff {id}"))
}

#[async_trait]
impl StaffRepository for PostgresStaffRepository {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, RepositoryError> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: PgTx) -> Result<(), RepositoryError> {
        Ok(tx.commit().await?)
    }

    async fn create(
        &self,
        staff: &NewStaff,
        tx: Option<&mut PgTx>,
    ) -> Result<Staff, RepositoryError> {
        let row = match tx {
            Some(tx) => insert_staff(&mut **tx, staff).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut tx = self.pool.begin().await?;
                    let row = insert_staff(&mut *tx, staff).await?;
                    tx.commit().await?;
                    Ok::<_, RepositoryError>(row)
                })
                .await?
            }
        };
        Ok(row.into())
    }

    async fn get_one(&self, id: StaffId, tx: Option<&mut PgTx>) -> Result<Staff, RepositoryError> {
        let row = match tx {
            Some(tx) => fetch_staff(&mut **tx, id).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    fetch_staff(&mut *conn, id).await
                })
                .await?
            }
        };
        row.map(Staff::from).ok_or_else(|| not_found(id))
    }

    async fn update(&self, staff: &Staff, tx: Option<&mut PgTx>) -> Result<Staff, RepositoryError> {
        let row = match tx {
            Some(tx) => update_staff(&mut **tx, staff).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut tx = self.pool.begin().await?;
                    let row = update_staff(&mut *tx, staff).await?;
                    tx.commit().await?;
                    Ok::<_, RepositoryError>(row)
                })
                .await?
            }
        };
        row.map(Staff::from).ok_or_else(|| not_found(staff.id))
    }

    async fn delete(&self, id: StaffId, tx: Option<&mut PgTx>) -> Result<(), RepositoryError> {
        let deleted = match tx {
            Some(tx) => delete_staff(&mut **tx, id).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut tx = self.pool.begin().await?;
                    let deleted = delete_staff(&mut *tx, id).await?;
                    tx.commit().await?;
                    Ok::<_, RepositoryError>(deleted)
                })
                .await?
            }
        };
        if deleted == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list(
        &self,
        query: &StaffListQuery,
        tx: Option<&mut PgTx>,
    ) -> Result<Page<Staff>, RepositoryError> {
        let conditions = list_conditions(query);
        match tx {
            Some(tx) => select_page(&mut **tx, &conditions, query.page, query.sort).await,
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    select_page(&mut *conn, &conditions, query.page, query.sort).await
                })
                .await
            }
        }
    }

    async fn list_by_business(
        &self,
        business_id: BusinessId,
        tx: Option<&mut PgTx>,
    ) -> Result<Vec<Staff>, RepositoryError> {
        match tx {
            Some(tx) => staff_of_business(&mut **tx, business_id).await,
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    staff_of_business(&mut *conn, business_id).await
                })
                .await
            }
        }
    }

    async fn search_by_fullname(
        &self,
        query: &StaffPageQuery,
        tx: Option<&mut PgTx>,
    ) -> Result<Page<Staff>, RepositoryError> {
        let conditions = keyword_conditions(query);
        match tx {
            Some(tx) => select_page(&mut **tx, &conditions, query.page, query.sort).await,
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    select_page(&mut *conn, &conditions, query.page, query.sort).await
                })
                .await
            }
        }
    }
}
