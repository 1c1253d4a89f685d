//! Database repository for CRUD operations.
//!
//! Every successful write bumps the global revision and publishes a change event
//! for the collection it touched. Writes are last-write-wins.

use std::sync::Arc;

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::changes::{ChangeFeed, Collection};
use crate::errors::AppError;
use crate::models::{
    Attendance, AttendanceStatus, AttendanceUpdate, Booking, Branch, Category,
    CreateServiceRequest, Offer, PromotionDraft, RefSnapshot, Referral, Service, Staff,
    StaffDraft, UpdateServiceRequest,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    feed: Arc<ChangeFeed>,
}

impl Repository {
    pub fn new(pool: SqlitePool, feed: Arc<ChangeFeed>) -> Self {
        Self { pool, feed }
    }

    pub fn feed(&self) -> &Arc<ChangeFeed> {
        &self.feed
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Increment the revision, notify subscribers of `collection`, return the new revision.
    async fn commit(&self, collection: Collection) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        let revision_id = self.get_revision_id().await?;
        self.feed.publish(collection, revision_id);
        Ok(revision_id)
    }

    /// Delete one row by id from a fixed table, committing on success.
    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", collection.as_str());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} {} not found",
                singular(collection),
                id
            )));
        }

        self.commit(collection).await?;
        Ok(())
    }

    // ==================== BRANCH OPERATIONS ====================

    /// List all branches, newest first.
    pub async fn list_branches(&self) -> Result<Vec<Branch>, AppError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM branches ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(branch_from_row).collect())
    }

    pub async fn create_branch(&self, name: &str) -> Result<Branch, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO branches (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        self.commit(Collection::Branches).await?;

        Ok(Branch {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Rename a branch. Promotions keep the name they were saved with.
    pub async fn rename_branch(&self, id: &str, name: &str) -> Result<Branch, AppError> {
        let row = sqlx::query("UPDATE branches SET name = ? WHERE id = ? RETURNING id, name, created_at")
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Branch {} not found", id)))?;

        self.commit(Collection::Branches).await?;
        Ok(branch_from_row(&row))
    }

    pub async fn delete_branch(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(Collection::Branches, id).await
    }

    // ==================== CATEGORY OPERATIONS ====================

    /// List all categories with their derived service counts, newest first.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query(
            r#"SELECT c.id, c.name, c.created_at,
                      (SELECT COUNT(*) FROM services s WHERE lower(s.category) = lower(c.name)) AS service_count
               FROM categories c ORDER BY c.created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    pub async fn get_category(&self, id: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query(
            r#"SELECT c.id, c.name, c.created_at,
                      (SELECT COUNT(*) FROM services s WHERE lower(s.category) = lower(c.name)) AS service_count
               FROM categories c WHERE c.id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        self.commit(Collection::Categories).await?;

        self.get_category(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Category {} vanished after insert", id)))
    }

    pub async fn rename_category(&self, id: &str, name: &str) -> Result<Category, AppError> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        self.commit(Collection::Categories).await?;

        self.get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(Collection::Categories, id).await
    }

    // ==================== SERVICE OPERATIONS ====================

    /// List all services, newest first.
    pub async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, category, price, is_active, created_at FROM services ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(service_from_row).collect())
    }

    pub async fn get_service(&self, id: &str) -> Result<Option<Service>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, category, price, is_active, created_at FROM services WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(service_from_row))
    }

    pub async fn create_service(&self, request: &CreateServiceRequest) -> Result<Service, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO services (id, name, category, price, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.category)
        .bind(request.price)
        .bind(request.is_active as i32)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let revision_id = self.commit(Collection::Services).await?;
        // Category counts are derived from services.
        self.feed.publish(Collection::Categories, revision_id);

        Ok(Service {
            id,
            name: request.name.clone(),
            category: request.category.clone(),
            price: request.price,
            is_active: request.is_active,
            created_at: now,
        })
    }

    pub async fn update_service(
        &self,
        id: &str,
        request: &UpdateServiceRequest,
    ) -> Result<Service, AppError> {
        let existing = self
            .get_service(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))?;

        let name = request.name.clone().unwrap_or(existing.name);
        let category = request.category.clone().unwrap_or(existing.category);
        let price = request.price.unwrap_or(existing.price);
        let is_active = request.is_active.unwrap_or(existing.is_active);

        sqlx::query("UPDATE services SET name = ?, category = ?, price = ?, is_active = ? WHERE id = ?")
            .bind(&name)
            .bind(&category)
            .bind(price)
            .bind(is_active as i32)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let revision_id = self.commit(Collection::Services).await?;
        self.feed.publish(Collection::Categories, revision_id);

        Ok(Service {
            id: id.to_string(),
            name,
            category,
            price,
            is_active,
            created_at: existing.created_at,
        })
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(Collection::Services, id).await?;
        self.feed
            .publish(Collection::Categories, self.get_revision_id().await?);
        Ok(())
    }

    // ==================== OFFER OPERATIONS ====================

    /// List all offers, newest first.
    pub async fn list_offers(&self) -> Result<Vec<Offer>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, name, description, discount, usage_limit, start_date, end_date,
                      is_active, image, branches, services, created_at, updated_at
               FROM offers ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(offer_from_row).collect())
    }

    pub async fn get_offer(&self, id: &str) -> Result<Option<Offer>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, name, description, discount, usage_limit, start_date, end_date,
                      is_active, image, branches, services, created_at, updated_at
               FROM offers WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(offer_from_row))
    }

    pub async fn create_offer(&self, draft: &PromotionDraft) -> Result<Offer, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let branches_json = serde_json::to_string(&draft.branches)?;
        let services_json = serde_json::to_string(&draft.services)?;

        sqlx::query(
            r#"INSERT INTO offers (
                id, name, description, discount, usage_limit, start_date, end_date,
                is_active, image, branches, services, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.discount)
        .bind(draft.usage_limit)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(draft.is_active as i32)
        .bind(&draft.image)
        .bind(&branches_json)
        .bind(&services_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.commit(Collection::Offers).await?;

        Ok(Offer {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            discount: draft.discount,
            usage_limit: draft.usage_limit,
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            is_active: draft.is_active,
            image: draft.image.clone(),
            branches: draft.branches.clone(),
            services: draft.services.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Overwrite an offer with the submitted form contents.
    pub async fn update_offer(&self, id: &str, draft: &PromotionDraft) -> Result<Offer, AppError> {
        let now = Utc::now().to_rfc3339();
        let branches_json = serde_json::to_string(&draft.branches)?;
        let services_json = serde_json::to_string(&draft.services)?;

        let result = sqlx::query(
            r#"UPDATE offers SET
                name = ?, description = ?, discount = ?, usage_limit = ?, start_date = ?,
                end_date = ?, is_active = ?, image = ?, branches = ?, services = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.discount)
        .bind(draft.usage_limit)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(draft.is_active as i32)
        .bind(&draft.image)
        .bind(&branches_json)
        .bind(&services_json)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Offer {} not found", id)));
        }

        self.commit(Collection::Offers).await?;

        self.get_offer(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Offer {} not found", id)))
    }

    pub async fn delete_offer(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(Collection::Offers, id).await
    }

    // ==================== REFERRAL OPERATIONS ====================

    /// List all referrals, newest first.
    pub async fn list_referrals(&self) -> Result<Vec<Referral>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, name, description, discount, usage_limit, start_date, end_date,
                      is_active, referral_code, branches, services, created_at, updated_at
               FROM referrals ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(referral_from_row).collect())
    }

    pub async fn get_referral(&self, id: &str) -> Result<Option<Referral>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, name, description, discount, usage_limit, start_date, end_date,
                      is_active, referral_code, branches, services, created_at, updated_at
               FROM referrals WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(referral_from_row))
    }

    pub async fn create_referral(&self, draft: &PromotionDraft) -> Result<Referral, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let branches_json = serde_json::to_string(&draft.branches)?;
        let services_json = serde_json::to_string(&draft.services)?;

        sqlx::query(
            r#"INSERT INTO referrals (
                id, name, description, discount, usage_limit, start_date, end_date,
                is_active, referral_code, branches, services, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.discount)
        .bind(draft.usage_limit)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(draft.is_active as i32)
        .bind(&draft.referral_code)
        .bind(&branches_json)
        .bind(&services_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.commit(Collection::Referrals).await?;

        Ok(Referral {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            discount: draft.discount,
            usage_limit: draft.usage_limit,
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            is_active: draft.is_active,
            referral_code: draft.referral_code.clone(),
            branches: draft.branches.clone(),
            services: draft.services.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Overwrite a referral with the submitted form contents.
    pub async fn update_referral(
        &self,
        id: &str,
        draft: &PromotionDraft,
    ) -> Result<Referral, AppError> {
        let now = Utc::now().to_rfc3339();
        let branches_json = serde_json::to_string(&draft.branches)?;
        let services_json = serde_json::to_string(&draft.services)?;

        let result = sqlx::query(
            r#"UPDATE referrals SET
                name = ?, description = ?, discount = ?, usage_limit = ?, start_date = ?,
                end_date = ?, is_active = ?, referral_code = ?, branches = ?, services = ?,
                updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.discount)
        .bind(draft.usage_limit)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(draft.is_active as i32)
        .bind(&draft.referral_code)
        .bind(&branches_json)
        .bind(&services_json)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Referral {} not found", id)));
        }

        self.commit(Collection::Referrals).await?;

        self.get_referral(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Referral {} not found", id)))
    }

    pub async fn delete_referral(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(Collection::Referrals, id).await
    }

    // ==================== STAFF OPERATIONS ====================

    /// List all staff ordered by name, ignoring case.
    pub async fn list_staff(&self) -> Result<Vec<Staff>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, role, phone, branch, active, created_at, updated_at FROM staff ORDER BY name COLLATE NOCASE, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(staff_from_row).collect())
    }

    pub async fn get_staff(&self, id: &str) -> Result<Option<Staff>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, role, phone, branch, active, created_at, updated_at FROM staff WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(staff_from_row))
    }

    pub async fn create_staff(&self, draft: &StaffDraft) -> Result<Staff, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO staff (id, name, role, phone, branch, active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(&draft.role)
        .bind(&draft.phone)
        .bind(&draft.branch)
        .bind(draft.active as i32)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.commit(Collection::Staff).await?;

        Ok(Staff {
            id,
            name: draft.name.clone(),
            role: draft.role.clone(),
            phone: draft.phone.clone(),
            branch: draft.branch.clone(),
            active: draft.active,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn update_staff(&self, id: &str, draft: &StaffDraft) -> Result<Staff, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE staff SET name = ?, role = ?, phone = ?, branch = ?, active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&draft.name)
        .bind(&draft.role)
        .bind(&draft.phone)
        .bind(&draft.branch)
        .bind(draft.active as i32)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Staff {} not found", id)));
        }

        self.commit(Collection::Staff).await?;

        self.get_staff(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff {} not found", id)))
    }

    /// Delete a staff member. Their attendance history is kept.
    pub async fn delete_staff(&self, id: &str) -> Result<(), AppError> {
        self.delete_by_id(Collection::Staff, id).await
    }

    // ==================== ATTENDANCE OPERATIONS ====================

    /// All attendance records for one day.
    pub async fn list_attendance(&self, day: &str) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, staff_id, day, status, check_in, check_out, notes, created_at, updated_at
               FROM attendance WHERE day = ? ORDER BY created_at"#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(attendance_from_row).collect())
    }

    pub async fn find_attendance(
        &self,
        staff_id: &str,
        day: &str,
    ) -> Result<Option<Attendance>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, staff_id, day, status, check_in, check_out, notes, created_at, updated_at
               FROM attendance WHERE staff_id = ? AND day = ?"#,
        )
        .bind(staff_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(attendance_from_row))
    }

    /// Insert a blank `present` record for (staff, day).
    ///
    /// A concurrent insert for the same pair is absorbed by the unique key and the
    /// surviving record is returned.
    pub async fn create_attendance(&self, staff_id: &str, day: &str) -> Result<Attendance, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO attendance
                (id, staff_id, day, status, check_in, check_out, notes, created_at, updated_at)
               VALUES (?, ?, ?, ?, NULL, NULL, NULL, ?, ?)"#,
        )
        .bind(&id)
        .bind(staff_id)
        .bind(day)
        .bind(AttendanceStatus::Present.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            self.commit(Collection::Attendance).await?;
        }

        self.find_attendance(staff_id, day).await?.ok_or_else(|| {
            AppError::Internal(format!("Attendance for {} on {} vanished", staff_id, day))
        })
    }

    pub async fn update_attendance(
        &self,
        id: &str,
        update: &AttendanceUpdate,
    ) -> Result<Attendance, AppError> {
        let now = Utc::now().to_rfc3339();
        let (sql, value) = match update {
            AttendanceUpdate::Status(status) => (
                "UPDATE attendance SET status = ?, updated_at = ? WHERE id = ?",
                status.as_str().to_string(),
            ),
            AttendanceUpdate::CheckIn(time) => (
                "UPDATE attendance SET check_in = ?, updated_at = ? WHERE id = ?",
                time.clone(),
            ),
            AttendanceUpdate::CheckOut(time) => (
                "UPDATE attendance SET check_out = ?, updated_at = ? WHERE id = ?",
                time.clone(),
            ),
        };

        let row = sqlx::query(&format!(
            "{} RETURNING id, staff_id, day, status, check_in, check_out, notes, created_at, updated_at",
            sql
        ))
        .bind(&value)
        .bind(&now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance {} not found", id)))?;

        self.commit(Collection::Attendance).await?;
        Ok(attendance_from_row(&row))
    }

    // ==================== BOOKING OPERATIONS ====================

    /// Bookings scheduled on one day, in storage order.
    pub async fn list_bookings(&self, day: &str) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, customer_name, services, booking_date, booking_time, branch, staff_id, staff
               FROM bookings WHERE booking_date = ? ORDER BY rowid"#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    /// Insert or replace bookings from an external export in one transaction.
    pub async fn import_bookings(&self, bookings: &[Booking]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for booking in bookings {
            let services_json = serde_json::to_string(&booking.services)?;
            sqlx::query(
                r#"INSERT INTO bookings (id, customer_name, services, booking_date, booking_time, branch, staff_id, staff)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT(id) DO UPDATE SET
                     customer_name = excluded.customer_name,
                     services = excluded.services,
                     booking_date = excluded.booking_date,
                     booking_time = excluded.booking_time,
                     branch = excluded.branch,
                     staff_id = excluded.staff_id,
                     staff = excluded.staff"#,
            )
            .bind(&booking.id)
            .bind(&booking.customer_name)
            .bind(&services_json)
            .bind(&booking.booking_date)
            .bind(&booking.booking_time)
            .bind(&booking.branch)
            .bind(&booking.staff_id)
            .bind(&booking.staff)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        if !bookings.is_empty() {
            self.commit(Collection::Bookings).await?;
        }
        Ok(bookings.len())
    }
}

// ==================== ROW MAPPING ====================

fn singular(collection: Collection) -> &'static str {
    match collection {
        Collection::Branches => "Branch",
        Collection::Categories => "Category",
        Collection::Services => "Service",
        Collection::Offers => "Offer",
        Collection::Referrals => "Referral",
        Collection::Staff => "Staff",
        Collection::Attendance => "Attendance",
        Collection::Bookings => "Booking",
    }
}

fn branch_from_row(row: &sqlx::sqlite::SqliteRow) -> Branch {
    Branch {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        service_count: row.get("service_count"),
        created_at: row.get("created_at"),
    }
}

fn service_from_row(row: &sqlx::sqlite::SqliteRow) -> Service {
    let is_active: i32 = row.get("is_active");
    Service {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        price: row.get("price"),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
    }
}

fn offer_from_row(row: &sqlx::sqlite::SqliteRow) -> Offer {
    let is_active: i32 = row.get("is_active");
    let branches: String = row.get("branches");
    let services: String = row.get("services");
    Offer {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        discount: row.get("discount"),
        usage_limit: row.get("usage_limit"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        is_active: is_active != 0,
        image: row.get("image"),
        branches: parse_snapshots(&branches),
        services: parse_snapshots(&services),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn referral_from_row(row: &sqlx::sqlite::SqliteRow) -> Referral {
    let is_active: i32 = row.get("is_active");
    let branches: String = row.get("branches");
    let services: String = row.get("services");
    Referral {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        discount: row.get("discount"),
        usage_limit: row.get("usage_limit"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        is_active: is_active != 0,
        referral_code: row.get("referral_code"),
        branches: parse_snapshots(&branches),
        services: parse_snapshots(&services),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn staff_from_row(row: &sqlx::sqlite::SqliteRow) -> Staff {
    let active: i32 = row.get("active");
    Staff {
        id: row.get("id"),
        name: row.get("name"),
        role: row.get("role"),
        phone: row.get("phone"),
        branch: row.get("branch"),
        active: active != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn attendance_from_row(row: &sqlx::sqlite::SqliteRow) -> Attendance {
    let status: String = row.get("status");
    Attendance {
        id: row.get("id"),
        staff_id: row.get("staff_id"),
        day: row.get("day"),
        status: AttendanceStatus::parse(&status),
        check_in: row.get("check_in"),
        check_out: row.get("check_out"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn booking_from_row(row: &sqlx::sqlite::SqliteRow) -> Booking {
    let services: String = row.get("services");
    Booking {
        id: row.get("id"),
        customer_name: row.get("customer_name"),
        services: parse_json_array(&services),
        booking_date: row.get("booking_date"),
        booking_time: row.get("booking_time"),
        branch: row.get("branch"),
        staff_id: row.get("staff_id"),
        staff: row.get("staff"),
    }
}

fn parse_snapshots(s: &str) -> Vec<RefSnapshot> {
    serde_json::from_str(s).unwrap_or_default()
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
