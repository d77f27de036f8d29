use crate::api::ContactApi;
use crate::error::{JoinError, JoinResult};
use crate::models::{Contact, ContactPatch};
use log::{error, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Contacts keyed by the uppercase first letter of their first name.
pub type ContactGroups = BTreeMap<String, Vec<Contact>>;

/// Groups in letter order; contacts keep their server order within a group.
pub fn group_by_initial(contacts: Vec<Contact>) -> ContactGroups {
    let mut groups = ContactGroups::new();
    for contact in contacts {
        groups
            .entry(contact.group_letter())
            .or_default()
            .push(contact);
    }
    groups
}

/// First word is the first name, everything after it the last name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

pub struct ContactsService {
    api: Arc<dyn ContactApi>,
    groups: watch::Sender<ContactGroups>,
}

impl ContactsService {
    pub fn new(api: Arc<dyn ContactApi>) -> Self {
        let (groups, _) = watch::channel(ContactGroups::new());
        ContactsService { api, groups }
    }

    pub fn groups(&self) -> ContactGroups {
        self.groups.borrow().clone()
    }

    /// All contacts in display order.
    pub fn all(&self) -> Vec<Contact> {
        self.groups.borrow().values().flatten().cloned().collect()
    }

    pub fn get_by_id(&self, id: u64) -> Option<Contact> {
        self.groups
            .borrow()
            .values()
            .flatten()
            .find(|c| c.id == id)
            .cloned()
    }

    pub async fn refresh(&self) -> JoinResult<()> {
        match self.api.list_contacts().await {
            Ok(contacts) => {
                self.groups.send_replace(group_by_initial(contacts));
                Ok(())
            }
            Err(err) => {
                error!("event=contacts_fetch status=error error={}", err);
                Err(err)
            }
        }
    }

    pub async fn add(&self, contact: &Contact) -> JoinResult<Contact> {
        let created = self.api.create_contact(contact).await.map_err(|err| {
            error!("event=contact_create status=error error={}", err);
            err
        })?;
        info!("event=contact_create status=ok id={}", created.id);
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&self, id: u64, patch: &ContactPatch) -> JoinResult<()> {
        if id == 0 {
            return Err(JoinError::MissingId("Contact"));
        }
        if patch.is_empty() {
            return Err(JoinError::EmptyPatch);
        }
        self.api.patch_contact(id, patch).await.map_err(|err| {
            error!("event=contact_update status=error id={} error={}", id, err);
            err
        })?;
        info!("event=contact_update status=ok id={}", id);
        self.refresh().await
    }

    pub async fn delete(&self, id: u64) -> JoinResult<()> {
        if id == 0 {
            return Err(JoinError::MissingId("Contact"));
        }
        self.api.delete_contact(id).await.map_err(|err| {
            error!("event=contact_delete status=error id={} error={}", id, err);
            err
        })?;
        info!("event=contact_delete status=ok id={}", id);
        self.refresh().await
    }
}
