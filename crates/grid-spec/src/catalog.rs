//! Built-in model specs for the planning-poker resources
//!
//! Audit fields (`CreatedAt`, `CreatedBy`, `ModifiedAt`, `ModifiedBy`) are
//! stamped by the backend and are therefore read-only everywhere.

use crate::error::SpecError;
use crate::field::FieldSpec;
use crate::model::{ModelSpec, ModelSpecBuilder};

fn with_audit_fields(builder: ModelSpecBuilder) -> ModelSpecBuilder {
    builder
        .field("ModifiedAt", FieldSpec::date().read_only())
        .field("ModifiedBy", FieldSpec::text().read_only())
        .field("CreatedAt", FieldSpec::date().read_only())
        .field("CreatedBy", FieldSpec::text().read_only())
}

/// Estimation card: one value of a card set
///
/// # Errors
/// Never in practice; the result type is kept so callers treat every spec
/// the same way.
pub fn card() -> Result<ModelSpec, SpecError> {
    let builder = ModelSpec::builder("Card")
        .field(
            "CardId",
            FieldSpec::id().data_key().read_only().with_width("12rem"),
        )
        .field("CardSetId", FieldSpec::number())
        .field("Value", FieldSpec::number())
        .field("DisplayName", FieldSpec::text().display_name());
    with_audit_fields(builder).build()
}

/// Card set: a point scheme such as Fibonacci or T-shirt sizes
///
/// # Errors
/// Never in practice.
pub fn card_set() -> Result<ModelSpec, SpecError> {
    let builder = ModelSpec::builder("CardSet")
        .field(
            "CardSetId",
            FieldSpec::id().data_key().read_only().with_width("12rem"),
        )
        .field("Name", FieldSpec::text().display_name());
    with_audit_fields(builder).build()
}

/// Poker room with its players shown as a related collection
///
/// # Errors
/// Never in practice.
pub fn poker_room() -> Result<ModelSpec, SpecError> {
    let builder = ModelSpec::builder("PokerRoom")
        .field(
            "PokerRoomId",
            FieldSpec::id().data_key().read_only().hidden(),
        )
        .field("Name", FieldSpec::text().display_name().frozen())
        .field("CardSetId", FieldSpec::number())
        .field(
            "PokerPlayers",
            FieldSpec::dropdown("PokerPlayerId", "DisplayName").read_only(),
        );
    with_audit_fields(builder).build()
}

/// Every built-in spec
///
/// # Errors
/// Propagates the first spec error.
pub fn all() -> Result<Vec<ModelSpec>, SpecError> {
    Ok(vec![card()?, card_set()?, poker_room()?])
}

/// Built-in spec by resource name (case-insensitive)
///
/// # Errors
/// Propagates spec errors; unknown names yield `Ok(None)`.
pub fn by_resource(resource: &str) -> Result<Option<ModelSpec>, SpecError> {
    Ok(all()?
        .into_iter()
        .find(|spec| spec.resource().eq_ignore_ascii_case(resource)))
}
