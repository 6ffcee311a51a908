use std::io::Write as _;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::display::PrintDisplayList;
use crate::job::{PrintJobId, PrintJobOptions};
use crate::renderer::Side;
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// One rendered slip face queued for spooling.
/// 待送往列印佇列的存款單頁面。
#[derive(Debug, Clone)]
pub struct SpoolPage {
    pub job_id: PrintJobId,
    pub page_number: u32,
    pub side: Side,
    pub display_list: PrintDisplayList,
}

/// Handle returned when a platform adapter begins a job.
/// 平台列印介面開始作業時回傳的控制物件。
pub trait PlatformJobHandle {
    type Error;

    fn submit_page(&mut self, page: SpoolPage) -> Result<(), Self::Error>;
    /// Completes the job; `document` is the PDF rendering of every submitted page.
    fn finish(self, document: &[u8]) -> Result<(), Self::Error>;
    fn abort(self, reason: &str);
}

/// Abstraction over platform-specific print APIs.
/// 平台列印 API 的抽象介面。
pub trait PlatformAdapter: Send + Sync {
    type Error;
    type JobHandle: PlatformJobHandle<Error = Self::Error>;

    fn begin_job(&self, options: &PrintJobOptions) -> Result<Self::JobHandle, Self::Error>;
}

/// Errors raised while handing a document to the system spooler.
/// 將文件交給系統列印佇列時發生的錯誤。
#[derive(Debug, Error)]
pub enum SpoolError {
    #[error("failed to start spool command `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to stream document to `{command}`")]
    Write {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("spool command `{command}` exited with {status}")]
    Status { command: String, status: ExitStatus },
    #[error("no pages were submitted for {job_id}")]
    Empty { job_id: PrintJobId },
}

/// Pipes the finished PDF into a command-line spooler such as `lp`.
/// 透過命令列列印工具（例如 `lp`）送出 PDF。
#[derive(Debug, Clone)]
pub struct SpoolCommandAdapter {
    program: String,
    args: Vec<String>,
}

impl SpoolCommandAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parses a whitespace-separated command line, e.g. `"lp -o fit-to-page"`.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for a job: fixed args, then `-d` and `-n` when applicable.
    pub fn arguments_for(&self, options: &PrintJobOptions) -> Vec<String> {
        let mut args = self.args.clone();
        if let Some(target) = &options.target {
            args.push("-d".to_string());
            args.push(target.name.clone());
        }
        if options.copies > 1 {
            args.push("-n".to_string());
            args.push(options.copies.to_string());
        }
        args
    }
}

impl Default for SpoolCommandAdapter {
    fn default() -> Self {
        Self::new("lp")
    }
}

pub struct SpoolCommandHandle {
    job_id: PrintJobId,
    program: String,
    args: Vec<String>,
    pages: usize,
}

impl PlatformAdapter for SpoolCommandAdapter {
    type Error = SpoolError;
    type JobHandle = SpoolCommandHandle;

    fn begin_job(&self, options: &PrintJobOptions) -> Result<Self::JobHandle, Self::Error> {
        Ok(SpoolCommandHandle {
            job_id: options.job_id,
            program: self.program.clone(),
            args: self.arguments_for(options),
            pages: 0,
        })
    }
}

impl PlatformJobHandle for SpoolCommandHandle {
    type Error = SpoolError;

    fn submit_page(&mut self, page: SpoolPage) -> Result<(), Self::Error> {
        tracing::debug!(job = %page.job_id, page = page.page_number, side = ?page.side, "queued page");
        self.pages += 1;
        Ok(())
    }

    fn finish(self, document: &[u8]) -> Result<(), Self::Error> {
        if self.pages == 0 {
            return Err(SpoolError::Empty {
                job_id: self.job_id,
            });
        }
        let command = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(job = %self.job_id, %command, bytes = document.len(), "spooling document");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| SpoolError::Spawn {
                command: command.clone(),
                source,
            })?;
        // stdin is dropped before waiting so the child sees EOF; it is reaped
        // even when the write fails.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(document),
            None => Ok(()),
        };
        let status = child.wait().map_err(|source| SpoolError::Write {
            command: command.clone(),
            source,
        })?;
        if !status.success() {
            return Err(SpoolError::Status { command, status });
        }
        written.map_err(|source| SpoolError::Write { command, source })
    }

    fn abort(self, reason: &str) {
        tracing::warn!(job = %self.job_id, reason, "spool job aborted before submission");
    }
}

/// Recorded job metadata produced by the mock adapter.
/// 模擬介面所記錄的列印作業中繼資料。
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedJob {
    pub options: PrintJobOptions,
    pub pages: Vec<SpoolPage>,
    pub document_len: usize,
    pub aborted: bool,
    pub abort_reason: Option<String>,
}

/// In-memory implementation of [`PlatformAdapter`] used for tests.
/// 測試使用的記憶體內部平台介面實作。
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockPlatformAdapter {
    jobs: Arc<Mutex<Vec<RecordedJob>>>,
}

#[cfg(test)]
impl MockPlatformAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain_jobs(&self) -> Vec<RecordedJob> {
        self.jobs.lock().expect("lock poisoned").drain(..).collect()
    }
}

#[cfg(test)]
pub struct MockJobHandle {
    options: PrintJobOptions,
    pages: Vec<SpoolPage>,
    sink: Arc<Mutex<Vec<RecordedJob>>>,
}

#[cfg(test)]
impl PlatformAdapter for MockPlatformAdapter {
    type Error = String;
    type JobHandle = MockJobHandle;

    fn begin_job(&self, options: &PrintJobOptions) -> Result<Self::JobHandle, Self::Error> {
        Ok(MockJobHandle {
            options: options.clone(),
            pages: Vec::new(),
            sink: self.jobs.clone(),
        })
    }
}

#[cfg(test)]
impl PlatformJobHandle for MockJobHandle {
    type Error = String;

    fn submit_page(&mut self, page: SpoolPage) -> Result<(), Self::Error> {
        self.pages.push(page);
        Ok(())
    }

    fn finish(self, document: &[u8]) -> Result<(), Self::Error> {
        let mut guard = self.sink.lock().expect("lock poisoned");
        guard.push(RecordedJob {
            options: self.options,
            pages: self.pages,
            document_len: document.len(),
            aborted: false,
            abort_reason: None,
        });
        Ok(())
    }

    fn abort(self, reason: &str) {
        let mut guard = self.sink.lock().expect("lock poisoned");
        guard.push(RecordedJob {
            options: self.options,
            pages: Vec::new(),
            document_len: 0,
            aborted: true,
            abort_reason: Some(reason.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{PrintJobOptions, PrintTarget};

    fn page(job_id: PrintJobId, page_number: u32, side: Side) -> SpoolPage {
        SpoolPage {
            job_id,
            page_number,
            side,
            display_list: PrintDisplayList::default(),
        }
    }

    #[test]
    fn mock_adapter_captures_pages() {
        let adapter = MockPlatformAdapter::new();
        let job_options = PrintJobOptions::new(Some(PrintTarget::new("Mock")), 1);
        let job_id = job_options.job_id;

        let mut handle = adapter.begin_job(&job_options).unwrap();
        handle.submit_page(page(job_id, 1, Side::Front)).unwrap();
        handle.submit_page(page(job_id, 2, Side::Back)).unwrap();
        handle.finish(b"%PDF-1.4").unwrap();

        let jobs = adapter.drain_jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].pages.len(), 2);
        assert_eq!(jobs[0].pages[1].side, Side::Back);
        assert_eq!(jobs[0].document_len, 8);
        assert!(!jobs[0].aborted);
        assert_eq!(jobs[0].options.job_id, job_id);
    }

    #[test]
    fn mock_adapter_records_abort_reason() {
        let adapter = MockPlatformAdapter::new();
        let handle = adapter.begin_job(&PrintJobOptions::default()).unwrap();
        handle.abort("user cancelled");

        let jobs = adapter.drain_jobs();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].aborted);
        assert_eq!(jobs[0].abort_reason.as_deref(), Some("user cancelled"));
    }

    #[test]
    fn spool_arguments_name_printer_and_copies() {
        let adapter = SpoolCommandAdapter::from_command_line("lp -o fit-to-page").unwrap();
        let options = PrintJobOptions::new(Some(PrintTarget::new("Front_Desk")), 2);
        assert_eq!(adapter.program(), "lp");
        assert_eq!(
            adapter.arguments_for(&options),
            vec!["-o", "fit-to-page", "-d", "Front_Desk", "-n", "2"]
        );
        assert!(SpoolCommandAdapter::from_command_line("   ").is_none());
        assert!(SpoolCommandAdapter::default()
            .arguments_for(&PrintJobOptions::default())
            .is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn spool_command_receives_document_on_stdin() {
        let adapter = SpoolCommandAdapter::new("cat");
        let options = PrintJobOptions::default();
        let mut handle = adapter.begin_job(&options).unwrap();
        handle.submit_page(page(options.job_id, 1, Side::Front)).unwrap();
        handle.finish(b"%PDF-1.4\n").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn failing_spool_command_reports_status() {
        let adapter = SpoolCommandAdapter::new("false");
        let options = PrintJobOptions::default();
        let mut handle = adapter.begin_job(&options).unwrap();
        handle.submit_page(page(options.job_id, 1, Side::Front)).unwrap();
        let err = handle.finish(&vec![b'%'; 256 * 1024]).unwrap_err();
        assert!(matches!(err, SpoolError::Status { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn spool_command_ignoring_stdin_reports_write_error() {
        let adapter = SpoolCommandAdapter::new("true");
        let options = PrintJobOptions::default();
        let mut handle = adapter.begin_job(&options).unwrap();
        handle.submit_page(page(options.job_id, 1, Side::Front)).unwrap();
        // Larger than a pipe buffer, so the write cannot finish before `true` exits.
        let err = handle.finish(&vec![b'%'; 1024 * 1024]).unwrap_err();
        assert!(matches!(err, SpoolError::Write { .. }), "{err}");
    }

    #[test]
    fn spool_without_pages_is_rejected() {
        let adapter = SpoolCommandAdapter::default();
        let handle = adapter.begin_job(&PrintJobOptions::default()).unwrap();
        assert!(matches!(
            handle.finish(b"%PDF"),
            Err(SpoolError::Empty { .. })
        ));
    }
}
