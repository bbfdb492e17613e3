use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    bounded,
    rows::{BusinessRow, StaffRow, BUSINESS_COLUMNS, STAFF_COLUMNS},
    PgTx,
};
use crate::domain::{
    models::{Business, BusinessId, BusinessListQuery, NewBusiness, Page, Staff},
    ports::outbound::{BusinessRepository, RepositoryError},
};

pub struct PostgresBusinessRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresBusinessRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

async fn insert_one(
    conn: &mut PgConnection,
    business: &NewBusiness,
) -> Result<BusinessRow, sqlx::Error> {
    sqlx::query_as::<_, BusinessRow>(
        r#"
        INSERT INTO business (name, description, address, business_type, status, worker_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, description, address, business_type, status, worker_name, created_at
        "#,
    )
    .bind(&business.name)
    .bind(&business.description)
    .bind(&business.address)
    .bind(&business.business_type)
    .bind(&business.status)
    .bind(&business.worker_name)
    .fetch_one(conn)
    .await
}

async fn insert_batch(
    conn: &mut PgConnection,
    businesses: &[NewBusiness],
) -> Result<Vec<BusinessRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO business (name, description, address, business_type, status, worker_name) ",
    );
    builder.push_values(businesses, |mut row, business| {
        row.push_bind(business.name.clone())
            .push_bind(business.description.clone())
            .push_bind(business.address.clone())
            .push_bind(business.business_type.clone())
            .push_bind(business.status.clone())
            .push_bind(business.worker_name.clone());
    });
    builder.push(format!(" RETURNING {BUSINESS_COLUMNS}"));

    builder
        .build_query_as::<BusinessRow>()
        .fetch_all(conn)
        .await
}

async fn fetch_business(
    conn: &mut PgConnection,
    id: BusinessId,
) -> Result<Option<BusinessRow>, sqlx::Error> {
    sqlx::query_as::<_, BusinessRow>(
        r#"
        SELECT id, name, description, address, business_type, status, worker_name, created_at
        FROM business
        WHERE id = $1
        "#,
    )
    .bind(id.as_uuid())
    .fetch_optional(conn)
    .await
}

/// Staff of every listed business, grouped by business id.
async fn fetch_staff_of(
    conn: &mut PgConnection,
    ids: Vec<Uuid>,
) -> Result<std::collections::HashMap<Uuid, Vec<Staff>>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Default::default());
    }

    let rows = sqlx::query_as::<_, StaffRow>(&format!(
        "SELECT {STAFF_COLUMNS} FROM staff WHERE business_id = ANY($1) ORDER BY created_at"
    ))
    .bind(ids)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.business_id, Staff::from(row)))
        .into_group_map())
}

async fn update_row(
    conn: &mut PgConnection,
    business: &Business,
) -> Result<Option<BusinessRow>, sqlx::Error> {
    sqlx::query_as::<_, BusinessRow>(
        r#"
        UPDATE business
        SET name = $2, description = $3, address = $4, business_type = $5, status = $6
        WHERE id = $1
        RETURNING id, name, description, address, business_type, status, worker_name, created_at
        "#,
    )
    .bind(business.id.as_uuid())
    .bind(&business.name)
    .bind(&business.description)
    .bind(&business.address)
    .bind(&business.business_type)
    .bind(&business.status)
    .fetch_optional(conn)
    .await
}

async fn delete_row(conn: &mut PgConnection, id: BusinessId) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM business WHERE id = $1")
        .bind(id.as_uuid())
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BusinessListQuery) {
    let filters = [
        ("name", &query.name),
        ("description", &query.description),
        ("address", &query.address),
        ("business_type", &query.business_type),
        ("status", &query.status),
        ("worker_name", &query.worker_name),
    ];

    let mut separator = " WHERE ";
    for (column, value) in filters {
        if let Some(value) = value {
            builder
                .push(separator)
                .push(column)
                .push(" = ")
                .push_bind(value.clone());
            separator = " AND ";
        }
    }
}

async fn select_page(
    conn: &mut PgConnection,
    query: &BusinessListQuery,
) -> Result<(Vec<BusinessRow>, i64), sqlx::Error> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM business");
    push_filters(&mut count, query);
    let total: i64 = count
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    let mut select =
        QueryBuilder::<Postgres>::new(format!("SELECT {BUSINESS_COLUMNS} FROM business"));
    push_filters(&mut select, query);
    // Column comes from a whitelist; id breaks ties so pages do not overlap.
    select.push(format!(
        " ORDER BY {} {}, id",
        query.sort.column, query.sort.direction
    ));
    select
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());

    let rows = select
        .build_query_as::<BusinessRow>()
        .fetch_all(&mut *conn)
        .await?;

    Ok((rows, total))
}

async fn list_page(
    conn: &mut PgConnection,
    query: &BusinessListQuery,
    with_staffs: bool,
) -> Result<Page<Business>, sqlx::Error> {
    let (rows, total) = select_page(&mut *conn, query).await?;

    let mut staff = if with_staffs {
        fetch_staff_of(&mut *conn, rows.iter().map(|r| r.id).collect()).await?
    } else {
        Default::default()
    };

    let data = rows
        .into_iter()
        .map(|row| {
            let staffs = staff.remove(&row.id).unwrap_or_default();
            row.into_business(staffs)
        })
        .collect();

    Ok(Page::new(data, query.page, total))
}

async fn business_with_staffs(
    conn: &mut PgConnection,
    id: BusinessId,
) -> Result<Option<Business>, sqlx::Error> {
    let Some(row) = fetch_business(&mut *conn, id).await? else {
        return Ok(None);
    };
    let mut staff = fetch_staff_of(&mut *conn, vec![row.id]).await?;
    let staffs = staff.remove(&row.id).unwrap_or_default();
    Ok(Some(row.into_business(staffs)))
}

fn not_found(id: BusinessId) -> RepositoryError {
    RepositoryError::NotFound(format!("business {id}"))
}

#[async_trait]
impl BusinessRepository for PostgresBusinessRepository {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, RepositoryError> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: PgTx) -> Result<(), RepositoryError> {
        Ok(tx.commit().await?)
    }

    async fn create(
        &self,
        business: &NewBusiness,
        tx: Option<&mut PgTx>,
    ) -> Result<Business, RepositoryError> {
        let row = match tx {
            Some(tx) => insert_one(&mut **tx, business).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    Ok::<_, RepositoryError>(insert_one(&mut *conn, business).await?)
                })
                .await?
            }
        };

        Ok(row.into_business(Vec::new()))
    }

    async fn create_batch(
        &self,
        businesses: &[NewBusiness],
        tx: Option<&mut PgTx>,
    ) -> Result<Vec<Business>, RepositoryError> {
        if businesses.is_empty() {
            return Ok(Vec::new());
        }

        let rows = match tx {
            Some(tx) => insert_batch(&mut **tx, businesses).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut tx = self.pool.begin().await?;
                    let rows = insert_batch(&mut *tx, businesses).await?;
                    tx.commit().await?;
                    Ok::<_, RepositoryError>(rows)
                })
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| row.into_business(Vec::new()))
            .collect())
    }

    async fn get_one(
        &self,
        id: BusinessId,
        tx: Option<&mut PgTx>,
    ) -> Result<Business, RepositoryError> {
        let row = match tx {
            Some(tx) => fetch_business(&mut **tx, id).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    Ok::<_, RepositoryError>(fetch_business(&mut *conn, id).await?)
                })
                .await?
            }
        };

        row.map(|row| row.into_business(Vec::new()))
            .ok_or_else(|| not_found(id))
    }

    async fn get_one_with_staffs(
        &self,
        id: BusinessId,
        tx: Option<&mut PgTx>,
    ) -> Result<Business, RepositoryError> {
        let business = match tx {
            Some(tx) => business_with_staffs(&mut **tx, id).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    Ok::<_, RepositoryError>(business_with_staffs(&mut *conn, id).await?)
                })
                .await?
            }
        };

        business.ok_or_else(|| not_found(id))
    }

    async fn update(
        &self,
        business: &Business,
        tx: Option<&mut PgTx>,
    ) -> Result<Business, RepositoryError> {
        let row = match tx {
            Some(tx) => update_row(&mut **tx, business).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut tx = self.pool.begin().await?;
                    let row = update_row(&mut *tx, business).await?;
                    tx.commit().await?;
                    Ok::<_, RepositoryError>(row)
                })
                .await?
            }
        };

        row.map(|row| row.into_business(Vec::new()))
            .ok_or_else(|| not_found(business.id))
    }

    async fn delete(&self, id: BusinessId, tx: Option<&mut PgTx>) -> Result<(), RepositoryError> {
        let deleted = match tx {
            Some(tx) => delete_row(&mut **tx, id).await?,
            None => {
                bounded(self.query_timeout, async {
                    let mut tx = self.pool.begin().await?;
                    let deleted = delete_row(&mut *tx, id).await?;
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
        query: &BusinessListQuery,
        tx: Option<&mut PgTx>,
    ) -> Result<Page<Business>, RepositoryError> {
        match tx {
            Some(tx) => Ok(list_page(&mut **tx, query, false).await?),
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    Ok::<_, RepositoryError>(list_page(&mut *conn, query, false).await?)
                })
                .await
            }
        }
    }

    async fn list_with_staffs(
        &self,
        query: &BusinessListQuery,
        tx: Option<&mut PgTx>,
    ) -> Result<Page<Business>, RepositoryError> {
        match tx {
            Some(tx) => Ok(list_page(&mut **tx, query, true).await?),
            None => {
                bounded(self.query_timeout, async {
                    let mut conn = self.pool.acquire().await?;
                    Ok::<_, RepositoryError>(list_page(&mut *conn, query, true).await?)
                })
                .await
            }
        }
    }
}
