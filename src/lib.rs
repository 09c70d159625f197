//! Layout engine for academic transcript PDFs.
//!
//! The crate splits transcript generation into three pieces: a content model
//! ([`model`]) describing students, sessions, semesters and courses; a layout
//! engine ([`layout`]) that walks a record and issues drawing operations; and
//! a canvas capability ([`canvas`]) those operations target, with a
//! `printpdf`-backed implementation in [`pdf`].  The engine owns the layout
//! rules (column widths, row heights, wrap threshold, shading) while the
//! canvas owns pages, fonts and the serialized bytes.
//!
//! ```no_run
//! use transcript_pdf::layout::{LevelTable, TranscriptRenderer};
//! use transcript_pdf::model::{AcademicRecord, Course, Semester, SemesterNumber, Session, Student};
//! use transcript_pdf::pdf::{PdfCanvas, DOCUMENT_TITLE};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let student = Student::new("Ada Obi", "2009/131083")
//!     .with_dept_name("Computer Science")
//!     .with_academic_year("2009/2010");
//!
//! let record = AcademicRecord::new().with_session(
//!     Session::new("2014/2015").with_semester(
//!         Semester::new(SemesterNumber::First).with_course(
//!             Course::new("Introduction to Computing", "CSC 101")
//!                 .with_grade("A")
//!                 .with_unit(3.0)
//!                 .with_score(78.0)
//!                 .with_point(4.0),
//!         ),
//!     ),
//! );
//!
//! let levels = LevelTable::new().with_level("2009/131083", "2014/2015", "200");
//! let mut canvas = PdfCanvas::new(DOCUMENT_TITLE)?;
//! TranscriptRenderer::new(&levels).render(&student, &record, &mut canvas)?;
//!
//! let rendered = canvas.finish()?;
//! std::fs::write(student.document_file_name(), &rendered.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod error;
pub mod layout;
pub mod model;
pub mod pdf;

#[cfg(feature = "outline")]
pub mod outline;
