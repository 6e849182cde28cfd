use crate::database::{UserStore, WriteBatch};
use crate::utils::CleanupError;

#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub collection: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub scanned: usize,
    /// Records whose profileImage was the empty string.
    pub fixed: usize,
    /// Documents the store reports as modified. Zero on dry runs.
    pub updated: u64,
    pub dry_run: bool,
}

/// Nulls every empty-string `profileImage` in the collection with one
/// atomic batch. Returns instead of exiting so the caller decides the
/// process status.
pub async fn cleanup_empty_profile_images<S>(
    store: &S,
    options: &CleanupOptions,
) -> Result<CleanupReport, CleanupError>
where
    S: UserStore + ?Sized,
{
    log::info!("Starting cleanup of empty profileImage values...");

    let users = store.fetch_users(&options.collection).await?;

    let mut batch = WriteBatch::new();
    for user in &users {
        if user.has_empty_profile_image() {
            log::info!(
                "Fixing user {}: \"{}\" - removing empty profileImage",
                user.display_id(),
                user.display_name()
            );
            batch.null_profile_image(user.id.clone());
        }
    }

    let fixed = batch.len();
    let mut updated = 0;

    if fixed == 0 {
        log::info!("✓ No users found with empty profileImage values");
    } else if options.dry_run {
        log::info!("✓ Dry run: {} user(s) would be updated", fixed);
    } else {
        updated = store.commit(&options.collection, &batch).await?;
        log::info!("✓ Successfully updated {} user(s)", fixed);
    }

    log::info!("Cleanup complete!");

    Ok(CleanupReport {
        scanned: users.len(),
        fixed,
        updated,
        dry_run: options.dry_run,
    })
}
