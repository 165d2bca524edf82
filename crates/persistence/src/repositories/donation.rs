//! Donation repository for database operations.
//!
//! Every lifecycle transition here runs inside a single transaction and is
//! guarded by a compare-and-set update, so racing callers are serialized by
//! the database: one wins, the others observe a precise failure outcome.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::{AssignmentEntity, DonationDetailsEntity, DonationStatusDb};
use crate::metrics::QueryTimer;

/// Result of attempting to reserve a donation for a food bank.
#[derive(Debug)]
pub enum ReserveOutcome {
    Reserved(DonationDetailsEntity),
    DonationNotFound,
    AlreadyReserved,
}

/// Result of attempting to cancel a reservation.
#[derive(Debug)]
pub enum CancelOutcome {
    Cancelled(DonationDetailsEntity),
    DonationNotFound,
    NoAssignment,
    HeldByOther,
    AlreadyPickedUp,
}

/// Result of attempting to mark a donation as picked up.
#[derive(Debug)]
pub enum PickupOutcome {
    PickedUp(DonationDetailsEntity),
    DonationNotFound,
    NoAssignment,
    AlreadyPickedUp,
}

/// Result of attempting to delete a donation.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted(DonationDetailsEntity),
    NotFound,
    AssignmentExists,
}

/// Repository for donation-related database operations.
#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Creates a new DonationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new donation in AVAILABLE state.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        establishment_id: i64,
        product_name: &str,
        description: Option<&str>,
        quantity: i32,
        unit: &str,
        expiration_date: DateTime<Utc>,
        photo_url: Option<&str>,
    ) -> Result<DonationDetailsEntity, sqlx::Error> {
        let timer = QueryTimer::start("create_donation");
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO donations (establishment_id, product_name, description, quantity, unit,
                                   expiration_date, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(establishment_id)
        .bind(product_name)
        .bind(description)
        .bind(quantity)
        .bind(unit)
        .bind(expiration_date)
        .bind(photo_url)
        .fetch_one(&mut *tx)
        .await?;

        let details = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.finish();
        Ok(details)
    }

    /// Find a donation with its establishment and assignment details.
    pub async fn find_details(
        &self,
        id: i64,
    ) -> Result<Option<DonationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::start("find_donation_details");
        let result = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish();
        result
    }

    /// List donations in the given status, newest first.
    pub async fn list_by_status(
        &self,
        status: DonationStatusDb,
    ) -> Result<Vec<DonationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::start("list_donations_by_status");
        let result = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.status = $1
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await;
        timer.finish();
        result
    }

    /// List all donations published by an establishment, newest first.
    pub async fn list_by_establishment(
        &self,
        establishment_id: i64,
    ) -> Result<Vec<DonationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::start("list_donations_by_establishment");
        let result = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.establishment_id = $1
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish();
        result
    }

    /// List donations whose assignment, live or completed, references the
    /// food bank, newest first.
    pub async fn list_by_food_bank(
        &self,
        food_bank_id: i64,
    ) -> Result<Vec<DonationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::start("list_donations_by_food_bank");
        let result = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            JOIN donation_assignments a ON a.donation_id = d.id
            JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE a.food_bank_id = $1
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(food_bank_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish();
        result
    }

    /// List donations currently reserved by the food bank, newest first.
    pub async fn list_reserved_by_food_bank(
        &self,
        food_bank_id: i64,
    ) -> Result<Vec<DonationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::start("list_reserved_donations_by_food_bank");
        let result = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            JOIN donation_assignments a ON a.donation_id = d.id
            JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE a.food_bank_id = $1 AND d.status = 'reserved'
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(food_bank_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish();
        result
    }

    /// Partially update a donation's editable fields. Absent values keep the
    /// stored ones. Status is never touched here.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_fields(
        &self,
        id: i64,
        product_name: Option<&str>,
        description: Option<&str>,
        quantity: Option<i32>,
        unit: Option<&str>,
        expiration_date: Option<DateTime<Utc>>,
        photo_url: Option<&str>,
    ) -> Result<Option<DonationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::start("update_donation");
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE donations SET
                product_name = COALESCE($2, product_name),
                description = COALESCE($3, description),
                quantity = COALESCE($4, quantity),
                unit = COALESCE($5, unit),
                expiration_date = COALESCE($6, expiration_date),
                photo_url = COALESCE($7, photo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(product_name)
        .bind(description)
        .bind(quantity)
        .bind(unit)
        .bind(expiration_date)
        .bind(photo_url)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            timer.finish();
            return Ok(None);
        }

        let details = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.finish();
        Ok(Some(details))
    }

    /// Reserve an AVAILABLE donation for a food bank.
    ///
    /// The status update names the expected current status, so exactly one
    /// of any number of concurrent callers claims the row; the assignment
    /// insert is additionally covered by the UNIQUE constraint on
    /// donation_id.
    pub async fn reserve(
        &self,
        donation_id: i64,
        food_bank_id: i64,
    ) -> Result<ReserveOutcome, sqlx::Error> {
        let timer = QueryTimer::start("reserve_donation");
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE donations
            SET status = 'reserved', updated_at = NOW()
            WHERE id = $1 AND status = 'available'
            RETURNING id
            "#,
        )
        .bind(donation_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            // Distinguish a missing donation from a lost race
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM donations WHERE id = $1)",
            )
            .bind(donation_id)
            .fetch_one(&mut *tx)
            .await?;
            timer.finish();
            return Ok(if exists {
                ReserveOutcome::AlreadyReserved
            } else {
                ReserveOutcome::DonationNotFound
            });
        }

        sqlx::query(
            r#"
            INSERT INTO donation_assignments (donation_id, food_bank_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(donation_id)
        .bind(food_bank_id)
        .execute(&mut *tx)
        .await?;

        let details = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.id = $1
            "#,
        )
        .bind(donation_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.finish();
        Ok(ReserveOutcome::Reserved(details))
    }

    /// Cancel a reservation held by the given food bank, returning the
    /// donation to AVAILABLE.
    ///
    /// The delete names the holder and requires the pickup timestamp to be
    /// unset; when it removes no row the failure cause is read back inside
    /// the same transaction.
    pub async fn cancel_reservation(
        &self,
        donation_id: i64,
        food_bank_id: i64,
    ) -> Result<CancelOutcome, sqlx::Error> {
        let timer = QueryTimer::start("cancel_reservation");
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query_scalar::<_, i64>(
            r#"
            DELETE FROM donation_assignments
            WHERE donation_id = $1 AND food_bank_id = $2 AND picked_up_at IS NULL
            RETURNING id
            "#,
        )
        .bind(donation_id)
        .bind(food_bank_id)
        .fetch_optional(&mut *tx)
        .await?;

        if removed.is_none() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM donations WHERE id = $1)",
            )
            .bind(donation_id)
            .fetch_one(&mut *tx)
            .await?;
            if !exists {
                timer.finish();
                return Ok(CancelOutcome::DonationNotFound);
            }

            let assignment = sqlx::query_as::<_, AssignmentEntity>(
                r#"
                SELECT id, donation_id, food_bank_id, accepted_at, picked_up_at
                FROM donation_assignments
                WHERE donation_id = $1
                "#,
            )
            .bind(donation_id)
            .fetch_optional(&mut *tx)
            .await?;

            timer.finish();
            return Ok(match assignment {
                None => CancelOutcome::NoAssignment,
                Some(a) if a.food_bank_id != food_bank_id => CancelOutcome::HeldByOther,
                Some(_) => CancelOutcome::AlreadyPickedUp,
            });
        }

        sqlx::query(
            r#"
            UPDATE donations
            SET status = 'available', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(donation_id)
        .execute(&mut *tx)
        .await?;

        let details = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.id = $1
            "#,
        )
        .bind(donation_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.finish();
        Ok(CancelOutcome::Cancelled(details))
    }

    /// Record the pickup of a reserved donation, completing its lifecycle.
    ///
    /// The pickup timestamp is written once; the guard on `picked_up_at IS
    /// NULL` makes a second pickup observe a conflict instead of moving the
    /// timestamp.
    pub async fn mark_picked_up(&self, donation_id: i64) -> Result<PickupOutcome, sqlx::Error> {
        let timer = QueryTimer::start("mark_donation_picked_up");
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE donation_assignments
            SET picked_up_at = NOW()
            WHERE donation_id = $1 AND picked_up_at IS NULL
            RETURNING id
            "#,
        )
        .bind(donation_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM donations WHERE id = $1)",
            )
            .bind(donation_id)
            .fetch_one(&mut *tx)
            .await?;
            if !exists {
                timer.finish();
                return Ok(PickupOutcome::DonationNotFound);
            }

            let has_assignment = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM donation_assignments WHERE donation_id = $1)",
            )
            .bind(donation_id)
            .fetch_one(&mut *tx)
            .await?;

            timer.finish();
            return Ok(if has_assignment {
                PickupOutcome::AlreadyPickedUp
            } else {
                PickupOutcome::NoAssignment
            });
        }

        sqlx::query(
            r#"
            UPDATE donations
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(donation_id)
        .execute(&mut *tx)
        .await?;

        let details = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.id = $1
            "#,
        )
        .bind(donation_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.finish();
        Ok(PickupOutcome::PickedUp(details))
    }

    /// Delete a donation that no assignment references, returning its last
    /// view. Reserved and completed donations are never deleted.
    pub async fn delete(&self, donation_id: i64) -> Result<DeleteOutcome, sqlx::Error> {
        let timer = QueryTimer::start("delete_donation");
        let mut tx = self.pool.begin().await?;

        let details = sqlx::query_as::<_, DonationDetailsEntity>(
            r#"
            SELECT d.id, d.establishment_id, e.name AS establishment_name,
                   a.id AS assignment_id, a.food_bank_id, fb.name AS food_bank_name,
                   d.product_name, d.description, d.quantity, d.unit, d.expiration_date,
                   d.photo_url, d.status, d.created_at, d.updated_at
            FROM donations d
            JOIN establishments e ON d.establishment_id = e.id
            LEFT JOIN donation_assignments a ON a.donation_id = d.id
            LEFT JOIN food_banks fb ON fb.id = a.food_bank_id
            WHERE d.id = $1
            "#,
        )
        .bind(donation_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(details) = details else {
            timer.finish();
            return Ok(DeleteOutcome::NotFound);
        };
        if domain::services::can_delete(details.assignment_id.is_some()).is_err() {
            timer.finish();
            return Ok(DeleteOutcome::AssignmentExists);
        }

        // Re-checked inside the delete so a reservation committed after the
        // read above still blocks the removal
        let result = sqlx::query(
            r#"
            DELETE FROM donations d
            WHERE d.id = $1
              AND NOT EXISTS (SELECT 1 FROM donation_assignments a WHERE a.donation_id = d.id)
            "#,
        )
        .bind(donation_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            timer.finish();
            return Ok(DeleteOutcome::AssignmentExists);
        }

        tx.commit().await?;
        timer.finish();
        Ok(DeleteOutcome::Deleted(details))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_donation_repository_is_send_and_clone() {
        fn assert_send_clone<T: Send + Clone>() {}
        assert_send_clone::<super::DonationRepository>();
    }
}
