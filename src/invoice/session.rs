//! Per-user form state.
//!
//! An [`InvoiceSession`] is the explicit context object every form operation
//! works on. Line items are addressed by their stable id so removing a row in
//! the middle never shifts the identity of the rows after it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::{
    HeaderFields, InvoiceRecord, LineItem, LineItemView, Totals, UpdateHeaderRequest,
    UpdateLineItemRequest,
};
use crate::document::GeneratedDocument;
use crate::validation::{ValidationError, Validator};

pub const NO_LINE_ITEMS_WARNING: &str =
    "Please add at least one line item to generate the invoice.";

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("line item {0} not found")]
    ItemNotFound(Uuid),
    #[error("{}", NO_LINE_ITEMS_WARNING)]
    NoLineItems,
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug)]
pub struct InvoiceSession {
    id: Uuid,
    header: HeaderFields,
    items: Vec<LineItem>,
    last_document: Option<Arc<GeneratedDocument>>,
    created_at: DateTime<Utc>,
}

impl InvoiceSession {
    pub fn new(id: Uuid) -> Self {
        Self::with_header(id, HeaderFields::default())
    }

    pub fn with_header(id: Uuid, header: HeaderFields) -> Self {
        Self {
            id,
            header,
            items: Vec::new(),
            last_document: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn header(&self) -> &HeaderFields {
        &self.header
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn add_item(&mut self) -> &LineItem {
        self.items.push(LineItem::new());
        &self.items[self.items.len() - 1]
    }

    /// Remove the item with `item_id`, keeping the order of the others.
    pub fn remove_item(&mut self, item_id: Uuid) -> Result<LineItem, SessionError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(SessionError::ItemNotFound(item_id))?;
        Ok(self.items.remove(position))
    }

    /// Apply `patch` to one item. Nothing is changed if the patch is rejected,
    /// including when the new amounts would not fit a `Decimal`.
    pub fn edit_item(
        &mut self,
        item_id: Uuid,
        patch: &UpdateLineItemRequest,
    ) -> Result<&LineItem, SessionError> {
        patch.validate().map_err(SessionError::Validation)?;

        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(SessionError::ItemNotFound(item_id))?;

        let mut edited = self.items[position].clone();
        if let Some(description) = &patch.description {
            edited.description = description.clone();
        }
        if let Some(unit_price) = patch.unit_price {
            edited.unit_price = unit_price;
        }
        if let Some(quantity) = patch.quantity {
            edited.quantity = u32::try_from(quantity).map_err(|_| {
                let error = ValidationError::quantity_too_large("quantity", quantity);
                SessionError::Validation(error.to_string())
            })?;
        }

        let mut staged = self.items.clone();
        staged[position] = edited;
        if Totals::checked_from_items(&staged).is_none() {
            let field = if patch.unit_price.is_some() { "unit_price" } else { "quantity" };
            return Err(SessionError::Validation(
                ValidationError::amount_too_large(field).to_string(),
            ));
        }

        self.items = staged;
        Ok(&self.items[position])
    }

    pub fn edit_header(&mut self, patch: &UpdateHeaderRequest) -> &HeaderFields {
        self.header.apply(patch);
        &self.header
    }

    pub fn totals(&self) -> Totals {
        Totals::from_items(&self.items)
    }

    /// Freeze the current form into a record.
    ///
    /// An empty item list is refused and forgets any previously generated
    /// document, so a stale invoice is never offered for download.
    pub fn submit(&mut self) -> Result<InvoiceRecord, SessionError> {
        if self.items.is_empty() {
            self.last_document = None;
            return Err(SessionError::NoLineItems);
        }
        Ok(InvoiceRecord::new(self.header.clone(), self.items.clone()))
    }

    pub fn store_document(&mut self, document: Arc<GeneratedDocument>) {
        self.last_document = Some(document);
    }

    pub fn last_document(&self) -> Option<Arc<GeneratedDocument>> {
        self.last_document.clone()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            header: self.header.clone(),
            items: self
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| LineItemView::new(index + 1, item))
                .collect(),
            totals: self.totals(),
            document_filename: self
                .last_document
                .as_ref()
                .map(|document| document.filename.clone()),
            created_at: self.created_at,
        }
    }
}

/// What the form shows after every interaction.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub header: HeaderFields,
    pub items: Vec<LineItemView>,
    pub totals: Totals,
    /// Set once a document has been generated and is ready for download
    pub document_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}
