//! Test infrastructure for the query engine.
//!
//! Defines a `Person` entity with a filter and sort surface wide
//! enough to exercise pagination, null ordering, and soft deletes
//! against the memory backend.

use bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meridian_query::backends::memory::MemoryStore;
use meridian_query::{
    Entity, EntityConfig, EntityRegistry, FilterConvert, FilterNode, FilterOp, QueryService,
    SortConvert, SortField, SortSpec,
};

/// The collection `Person` documents live in.
pub const PEOPLE: &str = "people";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub first_name: String,
    pub email: String,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PersonFilter {
    pub last_name: Option<String>,
    pub email_ends_with: Option<String>,
    pub min_score: Option<i64>,
}

impl FilterConvert for PersonFilter {
    fn to_node(&self) -> Option<FilterNode> {
        let mut leaves = Vec::new();
        if let Some(v) = &self.last_name {
            leaves.push(FilterNode::leaf("last_name", FilterOp::Eq, v.clone()));
        }
        if let Some(v) = &self.email_ends_with {
            leaves.push(FilterNode::leaf("email", FilterOp::EndsWith, v.clone()));
        }
        if let Some(v) = self.min_score {
            leaves.push(FilterNode::leaf("score", FilterOp::Gte, v));
        }
        FilterNode::all(leaves)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PersonSortField {
    LastName,
    Score,
    Email,
}

impl PersonSortField {
    fn name(self) -> &'static str {
        match self {
            PersonSortField::LastName => "last_name",
            PersonSortField::Score => "score",
            PersonSortField::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PersonSort {
    pub field: PersonSortField,
    pub direction: meridian_query::SortDirection,
}

impl PersonSort {
    pub fn asc(field: PersonSortField) -> Self {
        Self {
            field,
            direction: meridian_query::SortDirection::Asc,
        }
    }

    pub fn desc(field: PersonSortField) -> Self {
        Self {
            field,
            direction: meridian_query::SortDirection::Desc,
        }
    }
}

impl SortConvert for Vec<PersonSort> {
    fn to_spec(&self) -> SortSpec {
        self.iter()
            .map(|s| SortField::new(s.field.name(), s.direction))
            .collect()
    }
}

impl Entity for Person {
    const NAME: &'static str = "Person";
    type Filter = PersonFilter;
    type Sort = Vec<PersonSort>;
}

/// A query service over an empty memory store with `Person` registered.
pub fn person_service() -> QueryService<MemoryStore> {
    let registry = EntityRegistry::new().register(EntityConfig::new(Person::NAME, PEOPLE));
    QueryService::new(MemoryStore::new(), registry)
}

/// Builds a person document with a fresh random identifier.
pub fn person_doc(last_name: Option<&str>, first_name: &str, email: &str) -> Document {
    let mut doc = doc! {
        "_id": Uuid::new_v4().to_string(),
        "first_name": first_name,
        "email": email,
    };
    if let Some(last) = last_name {
        doc.insert("last_name", last);
    }
    doc
}

/// Like [`person_doc`], but marked as soft-deleted.
pub fn deleted_person_doc(last_name: &str, first_name: &str, email: &str) -> Document {
    let mut doc = person_doc(Some(last_name), first_name, email);
    doc.insert("deleted", true);
    doc
}

/// Seeds `count` people with zero-padded last names for a stable
/// alphabetical order.
pub fn seed_numbered_people(service: &QueryService<MemoryStore>, count: usize) {
    let store = service.store();
    for i in 0..count {
        let mut doc = person_doc(
            Some(&format!("Person{:03}", i)),
            "Test",
            &format!("person{:03}@example.com", i),
        );
        doc.insert("score", Bson::Int64(i as i64));
        store.insert(PEOPLE, doc);
    }
}

/// Sorts ascending by last name.
pub fn by_last_name() -> Vec<PersonSort> {
    vec![PersonSort::asc(PersonSortField::LastName)]
}
