//! Data structures describing a student's academic record.
//!
//! The types in this module form a serialization-friendly model of what a
//! transcript contains.  They intentionally avoid referencing the rendering
//! backend so the values can be produced by a data-access layer, persisted,
//! or exchanged over the network without pulling in heavy dependencies.
//!
//! Ordering matters: sessions, semesters and courses are rendered in the
//! order they were inserted.  The model never sorts; chronology is the
//! caller's responsibility.

/// Representation of photo sources supported by the content model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Image loaded from raw bytes.
    Bytes(Vec<u8>),
    /// Image referenced by a file path.
    Path(String),
}

impl ImageSource {
    /// Creates a new in-memory image from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates an image sourced from a file path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }
}

/// Identity block shown once per session at the top of the transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct Student {
    names: String,
    reg_no: String,
    dept_name: String,
    academic_year: String,
    photo: Option<ImageSource>,
}

impl Student {
    /// Creates a student with the given full name and registration number.
    pub fn new(names: impl Into<String>, reg_no: impl Into<String>) -> Self {
        Self {
            names: names.into(),
            reg_no: reg_no.into(),
            dept_name: String::new(),
            academic_year: String::new(),
            photo: None,
        }
    }

    /// Returns the student's full name.
    pub fn names(&self) -> &str {
        &self.names
    }

    /// Returns the registration number, the document's identity.
    pub fn reg_no(&self) -> &str {
        &self.reg_no
    }

    /// Returns the department name.
    pub fn dept_name(&self) -> &str {
        &self.dept_name
    }

    /// Returns the year-of-admission label.
    pub fn academic_year(&self) -> &str {
        &self.academic_year
    }

    /// Returns the passport photo, if one was supplied.
    pub fn photo(&self) -> Option<&ImageSource> {
        self.photo.as_ref()
    }

    /// Sets the department name and returns the updated student.
    pub fn with_dept_name(mut self, dept_name: impl Into<String>) -> Self {
        self.dept_name = dept_name.into();
        self
    }

    /// Sets the year-of-admission label and returns the updated student.
    pub fn with_academic_year(mut self, academic_year: impl Into<String>) -> Self {
        self.academic_year = academic_year.into();
        self
    }

    /// Sets the passport photo and returns the updated student.
    pub fn with_photo(mut self, photo: impl Into<Option<ImageSource>>) -> Self {
        self.photo = photo.into();
        self
    }

    /// Suggested file name for the rendered document.
    ///
    /// Registration numbers commonly embed the session separator (`/`), which
    /// is not filesystem-safe; it is replaced with `-` here.
    pub fn document_file_name(&self) -> String {
        format!("{}.pdf", self.reg_no.replace('/', "-"))
    }
}

/// Semester position within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SemesterNumber {
    /// First semester of the session.
    First,
    /// Second semester of the session.
    Second,
}

impl SemesterNumber {
    /// Returns the semester as the number used on printed transcripts.
    pub fn as_number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    /// Parses a printed semester number back into the enum.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            _ => None,
        }
    }
}

/// A single graded course as supplied by the data-access layer.
///
/// The numeric fields are optional because upstream records are not always
/// complete; rendering validates them up front and refuses to coerce missing
/// values to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Course {
    title: String,
    code: String,
    grade: String,
    unit: Option<f64>,
    score: Option<f64>,
    point: Option<f64>,
}

impl Course {
    /// Creates a course with the given title and code.
    pub fn new(title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
            grade: String::new(),
            unit: None,
            score: None,
            point: None,
        }
    }

    /// Returns the course title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the course code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the grade label, e.g. `A`.
    pub fn grade(&self) -> &str {
        &self.grade
    }

    /// Returns the credit units, if supplied.
    pub fn unit(&self) -> Option<f64> {
        self.unit
    }

    /// Returns the score obtained, if supplied.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Returns the grade-point weight, if supplied.
    pub fn point(&self) -> Option<f64> {
        self.point
    }

    /// Sets the grade label and returns the updated course.
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into();
        self
    }

    /// Sets the credit units and returns the updated course.
    pub fn with_unit(mut self, unit: impl Into<Option<f64>>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the score and returns the updated course.
    pub fn with_score(mut self, score: impl Into<Option<f64>>) -> Self {
        self.score = score.into();
        self
    }

    /// Sets the grade-point weight and returns the updated course.
    pub fn with_point(mut self, point: impl Into<Option<f64>>) -> Self {
        self.point = point.into();
        self
    }
}

/// One semester's worth of graded courses.
#[derive(Clone, Debug, PartialEq)]
pub struct Semester {
    number: SemesterNumber,
    courses: Vec<Course>,
}

impl Semester {
    /// Creates an empty semester.
    pub fn new(number: SemesterNumber) -> Self {
        Self {
            number,
            courses: Vec::new(),
        }
    }

    /// Returns the semester position.
    pub fn number(&self) -> SemesterNumber {
        self.number
    }

    /// Returns the courses in insertion order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Appends a course and returns the updated semester.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Extends the semester with multiple courses and returns the updated
    /// instance.
    pub fn with_courses<I>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = Course>,
    {
        self.courses.extend(courses);
        self
    }
}

/// An academic session (year) holding up to two semesters.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    label: String,
    semesters: Vec<Semester>,
}

impl Session {
    /// Creates an empty session with the given label, e.g. `2014/2015`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            semesters: Vec::new(),
        }
    }

    /// Returns the session label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the semesters in insertion order.
    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// Appends a semester and returns the updated session.
    ///
    /// A session may hold at most one semester per [`SemesterNumber`];
    /// duplicates are rejected when the record is rendered.
    pub fn with_semester(mut self, semester: Semester) -> Self {
        self.semesters.push(semester);
        self
    }
}

/// The full record rendered into one transcript document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AcademicRecord {
    sessions: Vec<Session>,
}

impl AcademicRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sessions in insertion order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Appends a session and returns the updated record.
    pub fn with_session(mut self, session: Session) -> Self {
        self.sessions.push(session);
        self
    }

    /// Extends the record with multiple sessions and returns the updated
    /// instance.
    pub fn with_sessions<I>(mut self, sessions: I) -> Self
    where
        I: IntoIterator<Item = Session>,
    {
        self.sessions.extend(sessions);
        self
    }
}
