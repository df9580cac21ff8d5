//! Tests for CatalogLoader: header skipping, dedup and prerequisite resolution

use rstest::{fixture, rstest};

use coursecat::domain::{
    tokenize, CatalogLoader, Course, CourseIndex, DomainError, LoaderOptions, Row,
};

/// Rows with 1-based line numbers in slice order.
fn rows(data: &[&[&str]]) -> Vec<Row> {
    data.iter()
        .enumerate()
        .map(|(i, fields)| Row::new(i as u64 + 1, fields.iter().copied()))
        .collect()
}

#[fixture]
fn loader() -> CatalogLoader {
    CatalogLoader::new()
}

#[rstest]
fn given_two_rows_with_prerequisite_when_loading_then_resolves_and_orders(loader: CatalogLoader) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&["CS101", "Intro", ""], &["CS201", "Data Structures", "CS101"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert_eq!(report.inserted, 2);
    assert!(report.errors.is_empty());
    assert_eq!(index.find("CS201").unwrap().prerequisites(), ["CS101".to_string()]);
    assert!(index.find("CS101").unwrap().prerequisites().is_empty());
    let order: Vec<&str> = index.iter().map(Course::number).collect();
    assert_eq!(order, vec!["CS101", "CS201"]);
}

#[rstest]
#[case::course_id("courseId")]
#[case::course_num("courseNum")]
fn given_header_row_when_loading_then_skipped(loader: CatalogLoader, #[case] header: &str) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&[header, "courseTitle"], &["CS101", "Intro"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped_headers, 1);
    assert!(index.find(header).is_none());
}

#[rstest]
fn given_header_sentinel_in_other_case_when_loading_then_treated_as_course(
    loader: CatalogLoader,
) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&["COURSEID", "Shouting Header"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert_eq!(report.inserted, 1);
    assert!(index.find("COURSEID").is_some());
}

#[rstest]
fn given_empty_first_field_when_loading_then_skipped_without_error(loader: CatalogLoader) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&["", "No Number", "CS101"], &["CS101", "Intro"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped_headers, 1);
    assert!(report.errors.is_empty());
}

#[rstest]
fn given_single_field_row_when_loading_then_reports_malformed_and_continues(
    loader: CatalogLoader,
) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&["CS101", "Intro"], &["CS150"], &["CS201", "Data Structures"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(
        report.errors,
        vec![DomainError::MalformedRow { line: 2, fields: 1 }]
    );
    assert!(report.has_errors());
    assert!(index.find("CS150").is_none());
}

#[rstest]
fn given_exactly_two_fields_when_loading_then_no_prerequisites(loader: CatalogLoader) {
    let mut index = CourseIndex::new();

    loader
        .load(&rows(&[&["MATH201", "Discrete Mathematics"]]), &mut index)
        .unwrap();

    let course = index.find("MATH201").unwrap();
    assert!(course.prerequisites().is_empty());
    assert_eq!(course.listing_lines()[1], "No Prerequisites.");
}

#[rstest]
fn given_unknown_prerequisite_when_loading_then_dropped_silently(loader: CatalogLoader) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&["CS101", "Intro"], &["CS201", "Data Structures", "CS101", "CS999"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.dropped_prerequisites, 1);
    assert_eq!(index.find("CS201").unwrap().prerequisites(), ["CS101".to_string()]);
}

#[rstest]
fn given_padded_prerequisite_tokens_when_loading_then_trimmed_before_resolution(
    loader: CatalogLoader,
) {
    let mut index = CourseIndex::new();
    let batch = rows(&[
        &["CS101", "Intro"],
        &["MATH101", "Calculus"],
        &["CS201", "Data Structures", "  CS101", "MATH101\t", "   "],
    ]);

    loader.load(&batch, &mut index).unwrap();

    assert_eq!(
        index.find("CS201").unwrap().prerequisites(),
        ["CS101".to_string(), "MATH101".to_string()]
    );
}

#[rstest]
fn given_self_referencing_prerequisite_when_loading_then_not_resolved(loader: CatalogLoader) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&["CS301", "Algorithms", "CS301"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert!(index.find("CS301").unwrap().prerequisites().is_empty());
    assert_eq!(report.dropped_prerequisites, 1);
}

#[rstest]
fn given_prerequisite_defined_later_in_batch_when_loading_then_resolves(loader: CatalogLoader) {
    let mut index = CourseIndex::new();
    let batch = rows(&[&["CS201", "Data Structures", "CS101"], &["CS101", "Intro"]]);

    loader.load(&batch, &mut index).unwrap();

    assert_eq!(index.find("CS201").unwrap().prerequisites(), ["CS101".to_string()]);
}

#[rstest]
fn given_prerequisite_only_indexed_from_earlier_load_when_loading_then_dropped(
    loader: CatalogLoader,
) {
    // resolution is scoped to the batch, not the index
    let mut index = CourseIndex::new();
    loader.load(&rows(&[&["CS101", "Intro"]]), &mut index).unwrap();

    let report = loader
        .load(&rows(&[&["CS201", "Data Structures", "CS101"]]), &mut index)
        .unwrap();

    assert_eq!(report.dropped_prerequisites, 1);
    assert!(index.find("CS201").unwrap().prerequisites().is_empty());
}

#[rstest]
fn given_duplicate_numbers_in_batch_when_loading_then_first_wins(loader: CatalogLoader) {
    let mut index = CourseIndex::new();
    let batch = rows(&[
        &["CS101", "Intro"],
        &["CS201", "First Title", "CS101"],
        &["CS201", "Second Title"],
    ]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped_duplicates, 1);
    assert_eq!(index.len(), 2);
    assert_eq!(index.find("CS201").unwrap().title(), "First Title");
}

#[rstest]
fn given_prerequisite_matching_only_a_duplicate_row_when_loading_then_resolves(
    loader: CatalogLoader,
) {
    // CS305 names CS101, whose only batch row is a duplicate of an indexed course
    let mut index = CourseIndex::new();
    loader.load(&rows(&[&["CS101", "Intro"]]), &mut index).unwrap();

    let report = loader
        .load(
            &rows(&[&["CS101", "Intro again"], &["CS305", "Compilers", "CS101"]]),
            &mut index,
        )
        .unwrap();

    assert_eq!(report.skipped_duplicates, 1);
    assert_eq!(index.find("CS305").unwrap().prerequisites(), ["CS101".to_string()]);
}

#[rstest]
fn given_same_batch_loaded_twice_when_loading_then_second_pass_inserts_nothing(
    loader: CatalogLoader,
) {
    let mut index = CourseIndex::new();
    let batch = rows(&[
        &["courseNum", "courseTitle"],
        &["CS101", "Intro"],
        &["CS201", "Data Structures", "CS101"],
    ]);

    let first = loader.load(&batch, &mut index).unwrap();
    let snapshot: Vec<Course> = index.iter().cloned().collect();
    let second = loader.load(&batch, &mut index).unwrap();

    assert_eq!(first.inserted, 2);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped_duplicates, 2);
    assert_eq!(index.iter().cloned().collect::<Vec<_>>(), snapshot);
}

#[rstest]
fn given_zero_valid_rows_when_loading_then_ok_with_nothing_inserted(loader: CatalogLoader) {
    let mut index = CourseIndex::new();

    let report = loader
        .load(&rows(&[&["courseId", "courseTitle"], &[""]]), &mut index)
        .unwrap();

    assert_eq!(report.inserted, 0);
    assert!(index.is_empty());
}

#[test]
fn given_custom_sentinels_when_loading_then_only_those_are_headers() {
    let loader = CatalogLoader::with_options(LoaderOptions {
        header_sentinels: vec!["Number".to_string()],
    });
    let mut index = CourseIndex::new();
    let batch = rows(&[&["Number", "Title"], &["courseId", "Looks Like A Header"]]);

    let report = loader.load(&batch, &mut index).unwrap();

    assert_eq!(report.inserted, 1);
    assert!(index.find("Number").is_none());
    assert!(index.find("courseId").is_some());
}

#[rstest]
fn given_tokenized_csv_when_loading_then_quoted_title_kept_whole(loader: CatalogLoader) {
    let text = "CS101,Intro\nCS201,\"Data Structures, Part I\", CS101\n";
    let mut index = CourseIndex::new();

    loader.load(&tokenize(text, b',').unwrap(), &mut index).unwrap();

    let course = index.find("CS201").unwrap();
    assert_eq!(course.title(), "Data Structures, Part I");
    assert_eq!(course.prerequisites(), ["CS101".to_string()]);
}
