//! Error types shared across the transcript rendering pipeline.
//!
//! Validation failures abort the whole document before anything is drawn: a
//! partially rendered transcript would misrepresent an academic record.
//! Canvas failures carry an optional source error so callers can surface the
//! underlying drawing or image problem.

use std::fmt;

/// Numeric course fields that are checked before rendering starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseField {
    /// Credit units carried by the course.
    Unit,
    /// Raw score obtained by the student.
    Score,
    /// Grade-point weight of the awarded grade.
    Point,
}

impl CourseField {
    /// Returns the field name as it appears in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Score => "score",
            Self::Point => "point",
        }
    }
}

impl fmt::Display for CourseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies the course a validation error refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseRef {
    /// Session label the course was taken in, e.g. `2014/2015`.
    pub session: String,
    /// Semester number within the session, 1 or 2.
    pub semester: u8,
    /// Course code, e.g. `CSC 101`.
    pub code: String,
}

impl fmt::Display for CourseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "course {} ({} semester {})",
            self.code, self.session, self.semester
        )
    }
}

/// Problems detected in the input before any drawing takes place.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    /// The student has no registration number.
    MissingRegistrationNumber,
    /// The registration number contains characters that are not safe to use
    /// as a document identifier.
    UnsafeRegistrationNumber {
        /// The offending registration number.
        reg_no: String,
    },
    /// A numeric course field was not supplied by the data source.
    MissingCourseField {
        /// The course the field belongs to.
        course: CourseRef,
        /// The absent field.
        field: CourseField,
    },
    /// A session lists the same semester number more than once.
    DuplicateSemester {
        /// Session label the duplicate occurs in.
        session: String,
        /// The repeated semester number, 1 or 2.
        semester: u8,
    },
    /// A numeric course field was supplied but is not a finite number.
    MalformedCourseField {
        /// The course the field belongs to.
        course: CourseRef,
        /// The malformed field.
        field: CourseField,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRegistrationNumber => {
                write!(f, "Student registration number is missing")
            }
            Self::UnsafeRegistrationNumber { reg_no } => {
                write!(
                    f,
                    "Registration number {reg_no:?} is not a safe document identifier"
                )
            }
            Self::MissingCourseField { course, field } => {
                write!(f, "Missing {field} for {course}")
            }
            Self::DuplicateSemester { session, semester } => {
                write!(f, "Session {session} lists semester {semester} twice")
            }
            Self::MalformedCourseField {
                course,
                field,
                value,
            } => {
                write!(f, "Malformed {field} ({value}) for {course}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failure to resolve a student's level for a session.
///
/// Level lookups feed first-semester table headers; when one fails the header
/// text would be wrong, so the error propagates and aborts the render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupError {
    reg_no: String,
    session: String,
    message: String,
}

impl LookupError {
    /// Creates a lookup error for the given student and session.
    pub fn new(
        reg_no: impl Into<String>,
        session: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            reg_no: reg_no.into(),
            session: session.into(),
            message: message.into(),
        }
    }

    /// The registration number the lookup was keyed by.
    pub fn reg_no(&self) -> &str {
        &self.reg_no
    }

    /// The session label the lookup was keyed by.
    pub fn session(&self) -> &str {
        &self.session
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level lookup failed for {} in session {}: {}",
            self.reg_no, self.session, self.message
        )
    }
}

impl std::error::Error for LookupError {}

/// Error raised by a [`DocumentCanvas`][crate::canvas::DocumentCanvas]
/// implementation.
#[derive(Debug)]
pub struct CanvasError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl CanvasError {
    /// Creates a canvas error from a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a canvas error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CanvasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// Top-level error returned by transcript rendering.
#[derive(Debug)]
pub enum RenderError {
    /// The input failed validation; nothing was drawn.
    Validation(ValidationError),
    /// A level lookup failed while building a first-semester header.
    Lookup(LookupError),
    /// The document canvas reported a failure.
    Canvas(CanvasError),
}

impl From<ValidationError> for RenderError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<LookupError> for RenderError {
    fn from(err: LookupError) -> Self {
        Self::Lookup(err)
    }
}

impl From<CanvasError> for RenderError {
    fn from(err: CanvasError) -> Self {
        Self::Canvas(err)
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Transcript input rejected: {err}"),
            Self::Lookup(err) => write!(f, "Transcript header data unavailable: {err}"),
            Self::Canvas(err) => write!(f, "Document canvas failure: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Lookup(err) => Some(err),
            Self::Canvas(err) => Some(err),
        }
    }
}
