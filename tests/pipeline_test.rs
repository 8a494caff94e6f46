//! Integration tests for the export pipeline.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;
use visio2img::error::Result;
use visio2img::{
    Automation, Error, ExportEvent, ExportOutcome, ExportPipeline, ExportRequest, HostSession,
    Page,
};

/// Where the mock host should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Nowhere,
    Launch,
    OpenDocument,
    ListPages,
    ExportPage(usize),
}

/// Calls observed by the mock host.
#[derive(Debug, Default)]
struct Calls {
    opens: usize,
    closes: usize,
    exports: Vec<(usize, PathBuf)>,
}

/// Mock automation serving an in-memory document.
struct MockAutomation {
    pages: Vec<Page>,
    failure: Failure,
    write_files: bool,
    calls: Rc<RefCell<Calls>>,
}

impl MockAutomation {
    fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            failure: Failure::Nowhere,
            write_files: true,
            calls: Rc::new(RefCell::new(Calls::default())),
        }
    }

    fn failing(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    fn without_files(mut self) -> Self {
        self.write_files = false;
        self
    }
}

struct MockSession {
    pages: Vec<Page>,
    failure: Failure,
    write_files: bool,
    calls: Rc<RefCell<Calls>>,
    closed: bool,
}

impl Automation for MockAutomation {
    type Session = MockSession;

    fn open(&self, source: &Path) -> Result<MockSession> {
        self.calls.borrow_mut().opens += 1;
        match self.failure {
            Failure::Launch => Err(Error::HostUnavailable("not installed".into())),
            Failure::OpenDocument => Err(Error::SourceOpenFailed {
                path: source.to_path_buf(),
                reason: "locked by another process".into(),
            }),
            _ => Ok(MockSession {
                pages: self.pages.clone(),
                failure: self.failure,
                write_files: self.write_files,
                calls: self.calls.clone(),
                closed: false,
            }),
        }
    }
}

impl HostSession for MockSession {
    fn pages(&self) -> Result<Vec<Page>> {
        assert!(!self.closed, "pages read after close");
        if self.failure == Failure::ListPages {
            return Err(Error::Unexpected("RPC server unavailable".into()));
        }
        Ok(self.pages.clone())
    }

    fn export(&mut self, page: &Page, destination: &Path) -> Result<()> {
        assert!(!self.closed, "export called after close");
        if self.failure == Failure::ExportPage(page.position) {
            return Err(Error::ExportFailed {
                page: page.position,
                path: destination.to_path_buf(),
                reason: "destination vanished".into(),
            });
        }
        if self.write_files {
            fs::write(destination, b"image")?;
        }
        self.calls
            .borrow_mut()
            .exports
            .push((page.position, destination.to_path_buf()));
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        self.calls.borrow_mut().closes += 1;
    }
}

fn numbered(count: usize) -> Vec<Page> {
    (1..=count)
        .map(|n| Page::new(n, format!("Page {}", n)))
        .collect()
}

/// Temporary directory holding an existing source document.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("input.vsd");
    fs::write(&source, b"not really visio").unwrap();
    (dir, source)
}

fn run(automation: MockAutomation, request: &ExportRequest) -> (Result<ExportOutcome>, Rc<RefCell<Calls>>) {
    let calls = automation.calls.clone();
    let result = ExportPipeline::new(automation).run(request);
    (result, calls)
}

#[test]
fn test_single_page_keeps_destination_name() {
    let (dir, source) = workspace();
    let destination = dir.path().join("output.png");
    let request = ExportRequest::new(&source, &destination);

    let (result, calls) = run(MockAutomation::new(numbered(1)), &request);

    assert_eq!(result.unwrap(), ExportOutcome::Exported(vec![destination.clone()]));
    assert!(destination.exists());
    assert_eq!(calls.borrow().closes, 1);
}

#[test]
fn test_relative_destination_is_reported_verbatim() {
    let (_dir, source) = workspace();
    let request = ExportRequest::new(&source, "output.png");

    let (result, _) = run(MockAutomation::new(numbered(2)).without_files(), &request);

    assert_eq!(
        result.unwrap(),
        ExportOutcome::Exported(vec![PathBuf::from("output1.png"), PathBuf::from("output2.png")])
    );
}

#[test]
fn test_two_pages_are_numbered() {
    let (dir, source) = workspace();
    let request = ExportRequest::new(&source, dir.path().join("output.png"));

    let (result, calls) = run(MockAutomation::new(numbered(2)), &request);

    let expected = vec![dir.path().join("output1.png"), dir.path().join("output2.png")];
    assert_eq!(result.unwrap(), ExportOutcome::Exported(expected.clone()));
    for path in &expected {
        assert!(path.exists(), "{}", path.display());
    }
    let exported: Vec<_> = calls.borrow().exports.iter().map(|(p, _)| *p).collect();
    assert_eq!(exported, vec![1, 2]);
}

#[test]
fn test_ten_pages_use_two_digit_numbers() {
    let (dir, source) = workspace();
    let request = ExportRequest::new(&source, dir.path().join("output.png"));

    let (result, _) = run(MockAutomation::new(numbered(10)), &request);

    let outcome = result.unwrap();
    let names: Vec<_> = outcome
        .files()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let expected: Vec<_> = (1..=10).map(|i| format!("output{:02}.png", i)).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_export_by_index() {
    let (dir, source) = workspace();
    let destination = dir.path().join("third.gif");
    let request = ExportRequest::new(&source, &destination).with_page_index(3);

    let (result, calls) = run(MockAutomation::new(numbered(5)), &request);

    assert_eq!(result.unwrap(), ExportOutcome::Exported(vec![destination.clone()]));
    assert_eq!(calls.borrow().exports, vec![(3, destination)]);
}

#[test]
fn test_export_by_duplicated_name() {
    let (dir, source) = workspace();
    let pages = vec![
        Page::new(1, "Flow"),
        Page::new(2, "Legend"),
        Page::new(3, "Flow"),
    ];
    let request = ExportRequest::new(&source, dir.path().join("flow.jpg")).with_page_name("Flow");

    let (result, calls) = run(MockAutomation::new(pages), &request);

    assert_eq!(
        result.unwrap(),
        ExportOutcome::Exported(vec![dir.path().join("flow1.jpg"), dir.path().join("flow2.jpg")])
    );
    let exported: Vec<_> = calls.borrow().exports.iter().map(|(p, _)| *p).collect();
    assert_eq!(exported, vec![1, 3]);
}

#[test]
fn test_conflicting_selection_never_touches_host() {
    let (dir, source) = workspace();
    let request = ExportRequest::new(&source, dir.path().join("output.png"))
        .with_page_index(5)
        .with_page_name("Page 5");

    let (result, calls) = run(MockAutomation::new(numbered(10)), &request);

    assert!(matches!(result, Err(Error::ConflictingSelection)));
    assert_eq!(calls.borrow().opens, 0);
}

#[test]
fn test_unsupported_format_never_touches_host() {
    let (dir, source) = workspace();
    for name in ["output.pdf", "output", "output.svg"] {
        let request = ExportRequest::new(&source, dir.path().join(name));
        let (result, calls) = run(MockAutomation::new(numbered(1)), &request);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))), "{name}");
        assert_eq!(calls.borrow().opens, 0);
    }
}

#[test]
fn test_missing_source_never_touches_host() {
    let dir = TempDir::new().unwrap();
    let request = ExportRequest::new(dir.path().join("missing.vsd"), dir.path().join("out.png"));

    let (result, calls) = run(MockAutomation::new(numbered(1)), &request);

    assert!(matches!(result, Err(Error::SourceNotFound(_))));
    assert_eq!(calls.borrow().opens, 0);
}

#[test]
fn test_missing_destination_dir_never_touches_host() {
    let (dir, source) = workspace();
    let missing = dir.path().join("nope");
    let request = ExportRequest::new(&source, missing.join("out.png"));

    let (result, calls) = run(MockAutomation::new(numbered(1)), &request);

    match result {
        Err(Error::DestinationDirNotFound(path)) => assert_eq!(path, missing),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(calls.borrow().opens, 0);
}

#[test]
fn test_host_failures_before_session_are_propagated() {
    let (dir, source) = workspace();
    let request = ExportRequest::new(&source, dir.path().join("out.png"));

    let (result, calls) = run(MockAutomation::new(numbered(1)).failing(Failure::Launch), &request);
    assert!(matches!(result, Err(Error::HostUnavailable(_))));
    assert_eq!(calls.borrow().closes, 0);

    let (result, calls) = run(
        MockAutomation::new(numbered(1)).failing(Failure::OpenDocument),
        &request,
    );
    assert!(matches!(result, Err(Error::SourceOpenFailed { .. })));
    assert_eq!(calls.borrow().closes, 0);
}

#[test]
fn test_session_closed_exactly_once_on_every_path() {
    let (dir, source) = workspace();
    let destination = dir.path().join("out.png");

    let cases: Vec<(ExportRequest, Failure)> = vec![
        (ExportRequest::new(&source, &destination), Failure::Nowhere),
        (ExportRequest::new(&source, &destination), Failure::ListPages),
        (ExportRequest::new(&source, &destination).with_page_index(9), Failure::Nowhere),
        (ExportRequest::new(&source, &destination).with_page_name("nope"), Failure::Nowhere),
        (ExportRequest::new(&source, &destination), Failure::ExportPage(1)),
        (ExportRequest::new(&source, &destination), Failure::ExportPage(2)),
        (ExportRequest::new(&source, &destination), Failure::ExportPage(3)),
    ];

    for (request, failure) in cases {
        let (_, calls) = run(MockAutomation::new(numbered(3)).failing(failure), &request);
        let calls = calls.borrow();
        assert_eq!(calls.opens, 1, "{failure:?}");
        assert_eq!(calls.closes, 1, "{failure:?} {request:?}");
    }
}

#[test]
fn test_selection_failures() {
    let (dir, source) = workspace();
    let destination = dir.path().join("out.png");

    let request = ExportRequest::new(&source, &destination).with_page_index(100);
    let (result, _) = run(MockAutomation::new(numbered(10)), &request);
    assert!(matches!(
        result,
        Err(Error::PageIndexOutOfRange { index: 100, count: 10 })
    ));

    let request = ExportRequest::new(&source, &destination).with_page_name("unknown");
    let (result, _) = run(MockAutomation::new(numbered(10)), &request);
    assert!(matches!(result, Err(Error::PageNotFound(_))));
}

#[test]
fn test_export_stops_at_first_failure() {
    let (dir, source) = workspace();
    let request = ExportRequest::new(&source, dir.path().join("out.png"));

    let (result, calls) = run(
        MockAutomation::new(numbered(4)).failing(Failure::ExportPage(2)),
        &request,
    );

    match result {
        Err(Error::ExportFailed { page, path, .. }) => {
            assert_eq!(page, 2);
            assert_eq!(path, dir.path().join("out2.png"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    let calls = calls.borrow();
    assert_eq!(calls.exports.len(), 1);
    assert_eq!(calls.closes, 1);
    // Pages written before the failure stay on disk
    assert!(dir.path().join("out1.png").exists());
    assert!(!dir.path().join("out3.png").exists());
}

#[test]
fn test_empty_document_exports_nothing() {
    let (dir, source) = workspace();
    let request = ExportRequest::new(&source, dir.path().join("out.png"));

    let (result, calls) = run(MockAutomation::new(Vec::new()), &request);

    assert_eq!(result.unwrap(), ExportOutcome::NothingToExport);
    assert!(calls.borrow().exports.is_empty());
    assert_eq!(calls.borrow().closes, 1);
}

#[test]
fn test_progress_events() {
    let (dir, source) = workspace();
    let request = ExportRequest::new(&source, dir.path().join("out.png"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();

    let mut pipeline = ExportPipeline::new(MockAutomation::new(numbered(3))).with_progress(
        move |event| {
            let line = match event {
                ExportEvent::Started { total } => format!("start {}", total),
                ExportEvent::PageExported { page, path } => format!(
                    "page {} -> {}",
                    page.position,
                    path.file_name().unwrap().to_string_lossy()
                ),
            };
            sink.borrow_mut().push(line);
        },
    );
    pipeline.run(&request).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            "start 3".to_string(),
            "page 1 -> out1.png".to_string(),
            "page 2 -> out2.png".to_string(),
            "page 3 -> out3.png".to_string(),
        ]
    );
}
