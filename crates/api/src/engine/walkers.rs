//! Walker registry: applications and approval decisions.
//!
//! A user's role is only ever changed here, as a consequence of an approval
//! decision, and always through `petfy_core::walker::role_for_approval`.

use petfy_core::error::{CoreError, StateViolation};
use petfy_core::status::ApprovalStatus;
use petfy_core::types::DbId;
use petfy_core::walker::{
    check_approval_transition, role_for_approval, validate_application, validate_document_name,
};
use petfy_db::models::walker::{CreateWalker, Walker};
use petfy_db::repositories::{UserRepo, WalkerRepo};
use petfy_db::DbPool;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::storage::BlobStore;

/// An uploaded identity document.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// A walker application as submitted by a user.
#[derive(Debug, Clone)]
pub struct Application {
    pub phone: String,
    pub description: String,
    pub document: Option<Document>,
}

/// Submit a walker application for `user_id`. The profile starts PENDING.
///
/// Fails with `AlreadyWalker` if the user already has a profile. The
/// document is stored before the profile row is inserted and removed again
/// if the insert fails.
pub async fn apply(
    pool: &DbPool,
    blob_store: &dyn BlobStore,
    user_id: DbId,
    application: Application,
) -> AppResult<Walker> {
    let phone = application.phone.trim().to_string();
    let description = application.description.trim().to_string();
    validate_application(&phone, &description)?;
    if let Some(document) = &application.document {
        validate_document_name(&document.file_name)?;
    }

    UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
    if WalkerRepo::find_by_user(pool, user_id).await?.is_some() {
        return Err(StateViolation::AlreadyWalker.into());
    }

    let document_path = match &application.document {
        Some(document) => Some(
            blob_store
                .store(&document.file_name, &document.data)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to store document: {e}")))?,
        ),
        None => None,
    };

    let created = WalkerRepo::create(
        pool,
        &CreateWalker {
            user_id,
            phone,
            description,
            document_path: document_path.clone(),
        },
    )
    .await;
    let walker = match created {
        Ok(walker) => walker,
        Err(e) => {
            if let Some(reference) = &document_path {
                discard_document(blob_store, reference).await;
            }
            // Two concurrent applications from the same user.
            return Err(if is_unique_violation(&e, "uq_walkers_user_id") {
                AppError::from(StateViolation::AlreadyWalker)
            } else {
                AppError::from(e)
            });
        }
    };

    tracing::info!(walker_id = walker.id, user_id, "Walker application submitted");
    Ok(walker)
}

/// Approve an application (or re-approve a rejected one). Promotes the user
/// to the walker role.
pub async fn approve(pool: &DbPool, walker_id: DbId) -> AppResult<Walker> {
    decide(pool, walker_id, ApprovalStatus::Approved).await
}

/// Reject an application (or revoke an approval). Demotes the user to the
/// customer role.
pub async fn reject(pool: &DbPool, walker_id: DbId) -> AppResult<Walker> {
    decide(pool, walker_id, ApprovalStatus::Rejected).await
}

async fn decide(pool: &DbPool, walker_id: DbId, to: ApprovalStatus) -> AppResult<Walker> {
    let mut tx = pool.begin().await?;
    let walker = WalkerRepo::lock_by_id(&mut *tx, walker_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Walker",
            id: walker_id,
        })?;
    check_approval_transition(walker.approval(), to)?;

    let updated = WalkerRepo::set_approval(&mut *tx, walker_id, to).await?;

    let user = UserRepo::find_by_id_in(&mut *tx, walker.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: walker.user_id,
        })?;
    let role = role_for_approval(&user.role, to);
    if role != user.role {
        UserRepo::set_role(&mut *tx, user.id, role).await?;
    }
    tx.commit().await?;

    tracing::info!(walker_id, user_id = user.id, approval = %to, role, "Walker approval decided");
    Ok(updated)
}

/// Best-effort removal of a document whose profile row was never written.
async fn discard_document(blob_store: &dyn BlobStore, reference: &str) {
    if let Err(e) = blob_store.delete(reference).await {
        tracing::warn!(error = %e, reference, "Failed to remove orphaned document");
    }
}
