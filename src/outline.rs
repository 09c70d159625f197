//! Session outline injection built on top of `lopdf`.
//!
//! Rendered transcripts carry one student-info block per academic session;
//! this module attaches a flat PDF outline with one entry per session so
//! viewers can jump between years.  It post-processes the serialized bytes
//! rather than the live document, keeping the rendering backend unaware of
//! outlines.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::pdf::SectionMark;

/// Errors that can occur while embedding the outline into a rendered PDF.
#[derive(Debug)]
pub enum OutlineError {
    /// The PDF bytes could not be parsed by `lopdf`.
    Parse(lopdf::Error),
    /// A required catalog entry was missing from the document trailer.
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    InvalidCatalog,
    /// A section mark referenced a page that does not exist in the document.
    MissingPage {
        /// Title of the section whose page is missing.
        title: String,
        /// The requested (1-indexed) page number that could not be resolved.
        page_number: usize,
    },
}

impl From<lopdf::Error> for OutlineError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for OutlineError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for OutlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to parse PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage { title, page_number } => write!(
                f,
                "Section {title:?} refers to missing page {page_number} for its outline entry"
            ),
        }
    }
}

impl std::error::Error for OutlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingCatalog | Self::InvalidCatalog | Self::MissingPage { .. } => None,
        }
    }
}

/// Applies a flat outline mapping each recorded section to its first page.
///
/// The function loads the provided PDF bytes, builds an `/Outlines`
/// dictionary, and associates each mark with a `/Dest [page /Fit]` entry
/// targeting the page the section started on.  With no marks the bytes are
/// returned unchanged.
pub fn attach_session_outline(
    pdf_bytes: &[u8],
    marks: &[SectionMark],
) -> Result<Vec<u8>, OutlineError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let pages = document.get_pages();
    let mut entries = collect_entries(&mut document, marks, &pages)?;

    if entries.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let outlines_id = document.new_object_id();
    link_entries(outlines_id, &mut document, &mut entries);
    insert_outlines_root(outlines_id, &mut document, &entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(OutlineError::from)?;
    Ok(buffer)
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_entries(
    document: &mut Document,
    marks: &[SectionMark],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, OutlineError> {
    let mut entries = Vec::with_capacity(marks.len());

    for mark in marks {
        let page_ref = pages
            .get(&(mark.page as u32))
            .copied()
            .ok_or_else(|| OutlineError::MissingPage {
                title: mark.title.clone(),
                page_number: mark.page,
            })?;

        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: mark.title.clone(),
        });
    }

    Ok(entries)
}

fn link_entries(outlines_id: ObjectId, document: &mut Document, entries: &mut [OutlineEntry]) {
    for index in 0..entries.len() {
        let mut dictionary = Dictionary::new();
        dictionary.set(
            "Title",
            Object::string_literal(entries[index].title.as_str()),
        );
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entries[index].page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entries[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), OutlineError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| OutlineError::MissingCatalog)?;

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(OutlineError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| OutlineError::InvalidCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }

    catalog.set("Outlines", Object::Reference(outlines_id));

    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    Ok(())
}
