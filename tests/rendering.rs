use sha2::{Digest, Sha256};
use transcript_pdf::layout::{LevelTable, TranscriptRenderer};
use transcript_pdf::model::{
    AcademicRecord, Course, Semester, SemesterNumber, Session, Student,
};
use transcript_pdf::pdf::{PdfCanvas, RenderedDocument, DOCUMENT_TITLE};

const REG_NO: &str = "2009/131083";

fn sample_student() -> Student {
    Student::new("Ada Obi", REG_NO)
        .with_dept_name("Computer Science")
        .with_academic_year("2009/2010")
}

fn graded_course(title: &str, code: &str) -> Course {
    Course::new(title, code)
        .with_grade("A")
        .with_unit(3.0)
        .with_score(78.0)
        .with_point(4.0)
}

fn sample_record() -> AcademicRecord {
    AcademicRecord::new()
        .with_session(
            Session::new("2014/2015")
                .with_semester(
                    Semester::new(SemesterNumber::First)
                        .with_course(graded_course("Introduction to Computing", "CSC 101"))
                        .with_course(graded_course(
                            "A Thorough Survey of Digital Electronics and Microprocessor Systems",
                            "CSC 103",
                        )),
                )
                .with_semester(
                    Semester::new(SemesterNumber::Second)
                        .with_course(graded_course("Data Structures", "CSC 102")),
                ),
        )
        .with_session(
            Session::new("2015/2016").with_semester(
                Semester::new(SemesterNumber::First)
                    .with_course(graded_course("Operating Systems", "CSC 201")),
            ),
        )
}

fn levels() -> LevelTable {
    LevelTable::new()
        .with_level(REG_NO, "2014/2015", "100")
        .with_level(REG_NO, "2015/2016", "200")
}

fn render_sample() -> RenderedDocument {
    let mut canvas = PdfCanvas::new(DOCUMENT_TITLE).expect("canvas setup");
    let levels = levels();
    TranscriptRenderer::new(&levels)
        .render(&sample_student(), &sample_record(), &mut canvas)
        .expect("render sample transcript");
    canvas.finish().expect("serialize sample transcript")
}

/// Blanks out the volatile PDF metadata (timestamps, document ids) so byte
/// comparisons only see actual content.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut offset = 0;
        while offset + tag.len() < data.len() {
            let Some(position) = data[offset..]
                .windows(tag.len())
                .position(|window| window == tag)
            else {
                break;
            };
            let mut cursor = offset + position + tag.len();
            while cursor < data.len() && data[cursor] != terminator {
                let byte = data[cursor];
                if terminator == b')' || !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t')
                {
                    data[cursor] = b'0';
                }
                cursor += 1;
            }
            offset = cursor;
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(&mut normalized, b"<xmp:MetadataDate>", b"</xmp:MetadataDate>");
    scrub_xml(&mut normalized, b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>");
    scrub_xml(&mut normalized, b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>");
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

/// Zeroes indirect object numbers (`n 0 obj` headers and `n 0 R` references)
/// so two serializations of the same document compare equal even when the
/// writer numbered objects in a different order.
fn mask_object_numbers(data: &[u8]) -> Vec<u8> {
    let mut masked = Vec::with_capacity(data.len());
    let mut index = 0;
    while index < data.len() {
        let byte = data[index];
        let starts_number =
            byte.is_ascii_digit() && (index == 0 || !data[index - 1].is_ascii_digit());
        if starts_number {
            let mut end = index;
            while end < data.len() && data[end].is_ascii_digit() {
                end += 1;
            }
            let tail = &data[end..];
            if tail.starts_with(b" 0 R") || tail.starts_with(b" 0 obj") {
                masked.push(b'0');
                index = end;
                continue;
            }
        }
        masked.push(byte);
        index += 1;
    }
    masked
}

/// Splits the scrubbed, number-masked bytes into `obj`..`endobj` segments and
/// sorts them.  The cross-reference table and trailer fall away with the
/// split; they only restate object positions.
fn canonical_objects(bytes: &[u8]) -> Vec<Vec<u8>> {
    let masked = mask_object_numbers(&scrub_pdf(bytes));
    let mut objects = Vec::new();
    let mut cursor = 0;
    while cursor < masked.len() {
        let Some(position) = masked[cursor..]
            .windows(b"endobj".len())
            .position(|window| window == b"endobj")
        else {
            break;
        };
        let end = cursor + position;
        objects.push(masked[cursor..end].to_vec());
        cursor = end + b"endobj".len();
    }
    objects.sort();
    objects
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for object in canonical_objects(bytes) {
        hasher.update(&object);
    }
    hasher.finalize().into()
}

#[test]
fn renders_a_pdf_document() {
    let rendered = render_sample();
    assert!(
        rendered.bytes.starts_with(b"%PDF"),
        "output should carry a PDF header"
    );
}

#[test]
fn rendering_is_deterministic() {
    let first = render_sample();
    let second = render_sample();

    assert_eq!(
        first.bytes.len(),
        second.bytes.len(),
        "PDF sizes should match"
    );
    assert!(
        !canonical_objects(&first.bytes).is_empty(),
        "normalization should find PDF objects"
    );
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "PDF renders must carry identical objects after normalization"
    );
}

#[test]
fn each_session_records_a_mark() {
    let rendered = render_sample();
    let titles: Vec<&str> = rendered
        .marks
        .iter()
        .map(|mark| mark.title.as_str())
        .collect();
    assert_eq!(titles, ["2014/2015", "2015/2016"]);
    assert!(rendered.marks.iter().all(|mark| mark.page >= 1));
}

#[test]
fn long_records_flow_onto_further_pages() {
    let mut semester = Semester::new(SemesterNumber::First);
    for index in 0..60 {
        semester = semester.with_course(graded_course(
            &format!("Elective Topic {index}"),
            &format!("GSS {index:03}"),
        ));
    }
    let record =
        AcademicRecord::new().with_session(Session::new("2014/2015").with_semester(semester));

    let mut canvas = PdfCanvas::new(DOCUMENT_TITLE).expect("canvas setup");
    let levels = levels();
    TranscriptRenderer::new(&levels)
        .render(&sample_student(), &record, &mut canvas)
        .expect("render long transcript");
    let rendered = canvas.finish().expect("serialize long transcript");

    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert!(
        rendered.bytes.len() > render_sample().bytes.len(),
        "sixty course rows should outweigh the sample document"
    );
}

#[cfg(feature = "outline")]
#[test]
fn outline_attaches_one_entry_per_session() {
    use transcript_pdf::outline::attach_session_outline;

    let rendered = render_sample();
    let with_outline =
        attach_session_outline(&rendered.bytes, &rendered.marks).expect("attach outline");

    let has_outlines_root = with_outline
        .windows(b"/Outlines".len())
        .any(|window| window == b"/Outlines");
    assert!(has_outlines_root, "outline root should be present");
    assert!(with_outline.len() > rendered.bytes.len());
}
