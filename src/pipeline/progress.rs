// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for an office review
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewStats {
    pub documents_read: usize,
    pub documents_unreadable: usize,
    pub records_processed: usize,
    pub records_found: usize,
    pub duration_secs: u64,
}

impl ReviewStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found_rate(&self) -> f64 {
        if self.records_processed == 0 {
            return 0.0;
        }
        (self.records_found as f64 / self.records_processed as f64) * 100.0
    }

    pub fn documents_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        (self.documents_read + self.documents_unreadable) as f64 / self.duration_secs as f64
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    documents_read: AtomicUsize,
    documents_unreadable: AtomicUsize,
    records_processed: AtomicUsize,
    records_found: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_documents: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_documents as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(main_bar, detail_bar)
    }

    /// Counts without drawing anything.
    pub fn hidden() -> Self {
        Self::from_bars(ProgressBar::hidden(), ProgressBar::hidden())
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            documents_read: AtomicUsize::new(0),
            documents_unreadable: AtomicUsize::new(0),
            records_processed: AtomicUsize::new(0),
            records_found: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_documents_read(&self) {
        self.documents_read.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_documents_unreadable(&self) {
        self.documents_unreadable.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn record_result(&self, found: bool) {
        self.records_processed.fetch_add(1, Ordering::SeqCst);
        if found {
            self.records_found.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Extraction complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> ReviewStats {
        ReviewStats {
            documents_read: self.documents_read.load(Ordering::SeqCst),
            documents_unreadable: self.documents_unreadable.load(Ordering::SeqCst),
            records_processed: self.records_processed.load(Ordering::SeqCst),
            records_found: self.records_found.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let read = self.documents_read.load(Ordering::SeqCst);
        let unreadable = self.documents_unreadable.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Read: {} | Unreadable: {}", read, unreadable));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));

    match ProgressStyle::default_bar().template(progress_template(colored)) {
        Ok(style) => bar.set_style(style.progress_chars(if colored { "█▓▒░" } else { "=>-" })),
        Err(_) => bar.set_style(ProgressStyle::default_bar()),
    }
    bar
}

fn progress_template(colored: bool) -> &'static str {
    if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pdf ({eta}) {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} pdf ({eta}) {msg}"
    }
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
