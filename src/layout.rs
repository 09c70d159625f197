//! Transcript layout engine.
//!
//! [`TranscriptRenderer`] walks an [`AcademicRecord`] in insertion order and
//! issues cell, line and image operations against a
//! [`DocumentCanvas`][crate::canvas::DocumentCanvas]: one student info block
//! per session, then a header and course table per semester.  The engine is a
//! single pass with no backtracking; the only branches are the title wrap
//! threshold and the first/second semester header.
//!
//! The whole input is validated before the first draw call.  A transcript
//! that stops halfway through a semester would misrepresent the record, so
//! validation failures abort with nothing drawn.

use std::collections::BTreeMap;
use std::io::Cursor;

use log::warn;

use crate::canvas::{Align, CellStyle, DocumentCanvas, Edges, FontKind, Rgb};
use crate::error::{
    CanvasError, CourseField, CourseRef, LookupError, RenderError, ValidationError,
};
use crate::model::{AcademicRecord, Course, ImageSource, SemesterNumber, Student};

/// Widths of the six course-table columns, in document units: sequence,
/// title, code, unit, score + grade, quality point.
pub const COLUMN_WIDTHS: [f64; 6] = [14.0, 81.0, 22.0, 19.0, 25.0, 20.0];

/// Labels of the six course-table columns, matching [`COLUMN_WIDTHS`].
pub const COLUMN_HEADERS: [&str; 6] = [
    "S/NO.",
    "COURSE TITLE",
    "COURSE CODE",
    "CREDIT UNIT",
    "GRADE OBTAINED",
    "QUALITY POINT",
];

/// Course titles longer than this wrap onto a double-height row.
pub const TITLE_WRAP_LIMIT: usize = 45;

const ROW_HEIGHT_SINGLE: f64 = 6.0;
const ROW_HEIGHT_DOUBLE: f64 = 12.0;
const HEADER_ROW_HEIGHT: f64 = 10.0;
const SEMESTER_TITLE_HEIGHT: f64 = 6.0;
const TABLE_GAP: f64 = 10.0;

const PHOTO_WIDTH: f64 = 28.0;
const PHOTO_HEIGHT: f64 = 24.0;
const PHOTO_X_GAP: f64 = 0.6;
const PLACEHOLDER_PHOTO_PX: (u32, u32) = (112, 96);

const INFO_LABEL_WIDTH: f64 = 40.0;
const INFO_VALUE_WIDTH: f64 = 75.0;
const INFO_ROW_HEIGHT: f64 = 6.0;
const INFO_GAP: f64 = 5.0;

const ROW_FILL: Rgb = Rgb::new(224, 235, 255);
const HEADER_FILL: Rgb = Rgb::new(200, 219, 255);
const RULE_COLOR: Rgb = Rgb::new(128, 0, 0);

const INFO_STYLE: CellStyle = CellStyle::new(FontKind::Regular, 10.0)
    .with_fill_color(ROW_FILL)
    .with_draw_color(RULE_COLOR)
    .with_line_width(0.001);
const HEADER_STYLE: CellStyle = CellStyle::new(FontKind::Bold, 11.0)
    .with_fill_color(HEADER_FILL)
    .with_draw_color(RULE_COLOR)
    .with_line_width(0.1);
const BODY_STYLE: CellStyle = CellStyle::new(FontKind::Regular, 11.0)
    .with_fill_color(ROW_FILL)
    .with_draw_color(RULE_COLOR)
    .with_line_width(0.1);

/// Total width of the course table.
pub fn table_width() -> f64 {
    COLUMN_WIDTHS.iter().sum()
}

/// Resolves the level a student was in during a session.
///
/// Consulted only when building first-semester table headers; second-semester
/// headers carry no level or session text.
pub trait LevelLookup {
    /// Returns the level label (e.g. `200`) for the student in the session.
    fn level_for_session(&self, reg_no: &str, session: &str) -> Result<String, LookupError>;
}

/// In-memory [`LevelLookup`] backed by a map, useful for tests and callers
/// that resolve levels ahead of time.
#[derive(Clone, Debug, Default)]
pub struct LevelTable {
    levels: BTreeMap<(String, String), String>,
}

impl LevelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the level for a student and session.
    pub fn insert(
        &mut self,
        reg_no: impl Into<String>,
        session: impl Into<String>,
        level: impl Into<String>,
    ) {
        self.levels
            .insert((reg_no.into(), session.into()), level.into());
    }

    /// Records a level and returns the updated table.
    pub fn with_level(
        mut self,
        reg_no: impl Into<String>,
        session: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        self.insert(reg_no, session, level);
        self
    }
}

impl LevelLookup for LevelTable {
    fn level_for_session(&self, reg_no: &str, session: &str) -> Result<String, LookupError> {
        self.levels
            .get(&(reg_no.to_string(), session.to_string()))
            .cloned()
            .ok_or_else(|| LookupError::new(reg_no, session, "no profile recorded"))
    }
}

/// Renders academic records onto a [`DocumentCanvas`].
///
/// The renderer holds no per-document state; each [`render`][Self::render]
/// call owns its canvas exclusively, so separate documents may be rendered
/// concurrently as long as each gets its own canvas.
pub struct TranscriptRenderer<'a> {
    levels: &'a dyn LevelLookup,
}

impl<'a> TranscriptRenderer<'a> {
    /// Creates a renderer using the given level lookup.
    pub fn new(levels: &'a dyn LevelLookup) -> Self {
        Self { levels }
    }

    /// Lays out the full transcript for `student` onto `canvas`.
    ///
    /// Validation runs first and rejects the document before anything is
    /// drawn; see [`ValidationError`].  Level lookup failures abort the
    /// render, while photo problems degrade to a placeholder image.
    pub fn render(
        &self,
        student: &Student,
        record: &AcademicRecord,
        canvas: &mut dyn DocumentCanvas,
    ) -> Result<(), RenderError> {
        let sessions = check_record(student, record)?;

        for session in &sessions {
            canvas.mark_section(session.label);
            self.draw_student_info(student, canvas)?;

            for semester in &session.semesters {
                self.draw_table_header(student.reg_no(), session.label, semester.number, canvas)?;
                draw_table_body(&semester.courses, canvas)?;
            }
        }

        Ok(())
    }

    fn draw_student_info(
        &self,
        student: &Student,
        canvas: &mut dyn DocumentCanvas,
    ) -> Result<(), RenderError> {
        canvas.new_line(None)?;
        draw_photo(student, canvas)?;

        // Fill flags are fixed per field, not alternated by a counter.
        let rows = [
            ("NAME", student.names(), false, true),
            ("REGISTRATION NO", student.reg_no(), true, false),
            ("DEPARTMENT", student.dept_name(), false, false),
            ("YEAR OF ADMISSION", student.academic_year(), true, false),
        ];

        for (label, value, filled, top_border) in rows {
            canvas.advance(PHOTO_WIDTH + PHOTO_X_GAP);
            canvas.draw_cell(
                INFO_LABEL_WIDTH,
                INFO_ROW_HEIGHT,
                label,
                Edges::LEFT_TOP,
                Align::Left,
                true,
                &INFO_STYLE,
            )?;
            canvas.draw_cell(
                INFO_VALUE_WIDTH,
                INFO_ROW_HEIGHT,
                value,
                Edges::LEFT_RIGHT.with_top(top_border),
                Align::Left,
                filled,
                &INFO_STYLE,
            )?;
            canvas.new_line(None)?;
        }

        // Closing rule under the block.
        canvas.advance(PHOTO_WIDTH + PHOTO_X_GAP);
        canvas.draw_cell(
            INFO_LABEL_WIDTH + INFO_VALUE_WIDTH,
            0.0,
            "",
            Edges::TOP,
            Align::Left,
            false,
            &INFO_STYLE,
        )?;
        canvas.new_line(Some(INFO_GAP))?;

        Ok(())
    }

    fn draw_table_header(
        &self,
        reg_no: &str,
        session: &str,
        number: SemesterNumber,
        canvas: &mut dyn DocumentCanvas,
    ) -> Result<(), RenderError> {
        let title = match number {
            SemesterNumber::First => {
                let level = self.levels.level_for_session(reg_no, session)?;
                format!("FIRST SEMESTER - {level} ({session})")
            }
            // Second-semester headers carry no level or session text.
            SemesterNumber::Second => String::from("SECOND SEMESTER"),
        };

        canvas.draw_cell(
            table_width(),
            SEMESTER_TITLE_HEIGHT,
            &title,
            Edges::NONE,
            Align::Center,
            false,
            &HEADER_STYLE,
        )?;
        canvas.new_line(None)?;

        for (width, label) in COLUMN_WIDTHS.iter().zip(COLUMN_HEADERS) {
            canvas.draw_wrapping_cell(
                *width,
                HEADER_ROW_HEIGHT,
                label,
                Edges::ALL,
                Align::Center,
                true,
                &HEADER_STYLE,
            )?;
        }
        canvas.new_line(None)?;

        Ok(())
    }
}

fn draw_photo(student: &Student, canvas: &mut dyn DocumentCanvas) -> Result<(), RenderError> {
    match student.photo() {
        Some(source) => {
            if let Err(err) = canvas.draw_image(source, PHOTO_WIDTH, PHOTO_HEIGHT) {
                warn!(
                    "falling back to placeholder photo for {}: {}",
                    student.reg_no(),
                    err
                );
                draw_placeholder_photo(canvas)?;
            }
        }
        None => draw_placeholder_photo(canvas)?,
    }
    Ok(())
}

fn draw_placeholder_photo(canvas: &mut dyn DocumentCanvas) -> Result<(), RenderError> {
    let placeholder = placeholder_photo()?;
    canvas.draw_image(&placeholder, PHOTO_WIDTH, PHOTO_HEIGHT)?;
    Ok(())
}

/// Builds the flat gray stand-in used when no usable photo exists.
fn placeholder_photo() -> Result<ImageSource, CanvasError> {
    let (width, height) = PLACEHOLDER_PHOTO_PX;
    let pixels = image::ImageBuffer::from_pixel(width, height, image::Rgb([214u8, 214, 214]));
    let dynamic = image::DynamicImage::ImageRgb8(pixels);

    let mut bytes = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut bytes, image::ImageFormat::Png)
        .map_err(|err| CanvasError::with_source("Failed to encode placeholder photo", err))?;
    Ok(ImageSource::from_bytes(bytes.into_inner()))
}

fn draw_table_body(
    courses: &[CheckedCourse<'_>],
    canvas: &mut dyn DocumentCanvas,
) -> Result<(), CanvasError> {
    // Shading restarts unfilled for every semester table.
    let mut filled = false;

    for (index, checked) in courses.iter().enumerate() {
        let course = checked.course;
        let seq = (index + 1).to_string();
        let unit_display = format!("{:.1}", checked.unit);
        // The quality point follows the unit as printed, not the raw value.
        let rendered_unit: f64 = unit_display.parse().unwrap_or(checked.unit);
        let quality_display = format!("{:.2}", rendered_unit * checked.point);
        let grade_display = format!("{} {}", format_score(checked.score), course.grade());

        let cells: [(&str, Align, Edges); 6] = [
            (seq.as_str(), Align::Right, Edges::LEFT_TOP_BOTTOM),
            (course.title(), Align::Left, Edges::ALL),
            (course.code(), Align::Left, Edges::ALL),
            (unit_display.as_str(), Align::Center, Edges::ALL),
            (grade_display.as_str(), Align::Right, Edges::ALL),
            (quality_display.as_str(), Align::Center, Edges::ALL),
        ];

        if course.title().len() <= TITLE_WRAP_LIMIT {
            for (width, (text, align, border)) in COLUMN_WIDTHS.iter().zip(cells) {
                canvas.draw_cell(
                    *width,
                    ROW_HEIGHT_SINGLE,
                    text,
                    border,
                    align,
                    filled,
                    &BODY_STYLE,
                )?;
            }
        } else {
            for (width, (text, align, border)) in COLUMN_WIDTHS.iter().zip(cells) {
                canvas.draw_wrapping_cell(
                    *width,
                    ROW_HEIGHT_DOUBLE,
                    text,
                    border,
                    align,
                    filled,
                    &BODY_STYLE,
                )?;
            }
        }

        canvas.new_line(None)?;
        filled = !filled;
    }

    canvas.new_line(Some(TABLE_GAP))?;
    Ok(())
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        score.to_string()
    }
}

struct CheckedCourse<'a> {
    course: &'a Course,
    unit: f64,
    score: f64,
    point: f64,
}

struct CheckedSemester<'a> {
    number: SemesterNumber,
    courses: Vec<CheckedCourse<'a>>,
}

struct CheckedSession<'a> {
    label: &'a str,
    semesters: Vec<CheckedSemester<'a>>,
}

fn check_record<'a>(
    student: &Student,
    record: &'a AcademicRecord,
) -> Result<Vec<CheckedSession<'a>>, ValidationError> {
    check_reg_no(student.reg_no())?;

    let mut sessions = Vec::with_capacity(record.sessions().len());
    for session in record.sessions() {
        let mut semesters = Vec::with_capacity(session.semesters().len());
        let mut seen = [false; 2];
        for semester in session.semesters() {
            let slot = &mut seen[(semester.number().as_number() - 1) as usize];
            if *slot {
                return Err(ValidationError::DuplicateSemester {
                    session: session.label().to_string(),
                    semester: semester.number().as_number(),
                });
            }
            *slot = true;
            let mut courses = Vec::with_capacity(semester.courses().len());
            for course in semester.courses() {
                courses.push(check_course(session.label(), semester.number(), course)?);
            }
            semesters.push(CheckedSemester {
                number: semester.number(),
                courses,
            });
        }
        sessions.push(CheckedSession {
            label: session.label(),
            semesters,
        });
    }
    Ok(sessions)
}

fn check_reg_no(reg_no: &str) -> Result<(), ValidationError> {
    if reg_no.trim().is_empty() {
        return Err(ValidationError::MissingRegistrationNumber);
    }

    let safe = reg_no
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
        && !reg_no.contains("..");
    if safe {
        Ok(())
    } else {
        Err(ValidationError::UnsafeRegistrationNumber {
            reg_no: reg_no.to_string(),
        })
    }
}

fn check_course<'a>(
    session: &str,
    semester: SemesterNumber,
    course: &'a Course,
) -> Result<CheckedCourse<'a>, ValidationError> {
    Ok(CheckedCourse {
        course,
        unit: require_number(course.unit(), session, semester, course, CourseField::Unit)?,
        score: require_number(course.score(), session, semester, course, CourseField::Score)?,
        point: require_number(course.point(), session, semester, course, CourseField::Point)?,
    })
}

fn require_number(
    value: Option<f64>,
    session: &str,
    semester: SemesterNumber,
    course: &Course,
    field: CourseField,
) -> Result<f64, ValidationError> {
    let course_ref = || CourseRef {
        session: session.to_string(),
        semester: semester.as_number(),
        code: course.code().to_string(),
    };

    match value {
        None => Err(ValidationError::MissingCourseField {
            course: course_ref(),
            field,
        }),
        Some(v) if !v.is_finite() => Err(ValidationError::MalformedCourseField {
            course: course_ref(),
            field,
            value: v,
        }),
        Some(v) => Ok(v),
    }
}
