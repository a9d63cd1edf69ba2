use crate::{
    error::Result,
    integrations::google_sheets::run_post_commit,
    models::contact::Contact,
    state::AppState,
    validation::contact::{validate_contact, ContactRequest},
};

/// Validates and stores a contact submission, then runs the mirror.
///
/// Nothing is written when validation fails. Once the insert succeeds the
/// contact is returned whatever the mirror does.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The raw contact form payload.
///
/// # Returns
///
/// A `Result` containing the stored `Contact`.
pub async fn submit_contact(state: &AppState, request: ContactRequest) -> Result<Contact> {
    let new_contact = validate_contact(request)?;

    let contact = state.contacts.insert(new_contact).await?;
    tracing::info!("✅ Contact saved: {}", contact.id);

    run_post_commit(state.mirror.as_deref(), &contact).await;

    Ok(contact)
}

/// Lists all stored contacts, newest first.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// A `Result` containing every contact ordered by `submittedAt` descending.
pub async fn list_contacts(state: &AppState) -> Result<Vec<Contact>> {
    let contacts = state.contacts.list_newest_first().await?;
    tracing::debug!("Listed {} contacts", contacts.len());
    Ok(contacts)
}
