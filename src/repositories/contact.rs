use async_trait::async_trait;
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::{
    db::CONTACTS_COLLECTION,
    error::Result,
    models::contact::{Contact, ContactDocument, NewContact},
};

/// Storage for contact submissions.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Stores a validated submission and returns it with its id and timestamp.
    async fn insert(&self, contact: NewContact) -> Result<Contact>;

    /// Lists every submission, newest first.
    async fn list_newest_first(&self) -> Result<Vec<Contact>>;
}

/// `ContactRepository` backed by the `contacts` collection.
#[derive(Clone)]
pub struct MongoContactRepository {
    collection: Collection<ContactDocument>,
}

impl MongoContactRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(CONTACTS_COLLECTION),
        }
    }
}

#[async_trait]
impl ContactRepository for MongoContactRepository {
    async fn insert(&self, contact: NewContact) -> Result<Contact> {
        let document = ContactDocument::new(contact, Utc::now());
        self.collection.insert_one(&document).await?;
        tracing::debug!("Contact stored with id {}", document.id);
        Ok(document.into())
    }

    async fn list_newest_first(&self) -> Result<Vec<Contact>> {
        let documents: Vec<ContactDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "submittedAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(documents.into_iter().map(Contact::from).collect())
    }
}
