use std::time::Instant;

use log::{info, trace};

use crate::{
    config::BenchConfig,
    error::RenderError,
    fractals::Viewport,
    output::OutputSink,
    pixel_buffer::PixelBuffer,
    tiles::TileScheduler,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingRecord {
    pub grain_size: u32,
    pub elapsed_seconds: f64,
}

/// Timings in the order the grain sizes were tested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingSeries {
    records: Vec<TimingRecord>,
}

impl TimingSeries {
    pub fn push(&mut self, record: TimingRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fastest(&self) -> Option<TimingRecord> {
        self.records
            .iter()
            .copied()
            .min_by(|a, b| a.elapsed_seconds.total_cmp(&b.elapsed_seconds))
    }

    /// `grain_size seconds` header, then one `<grain> <seconds>` line per record.
    pub fn to_table(&self) -> String {
        let mut table = String::from("grain_size seconds\n");
        for record in &self.records {
            table.push_str(&format!(
                "{} {}\n",
                record.grain_size, record.elapsed_seconds
            ));
        }
        table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Idle,
    Rendering { grain_size: u32 },
    Timed { grain_size: u32 },
    Done,
}

pub struct BenchmarkHarness {
    config: BenchConfig,
    viewport: Viewport,
    scheduler: TileScheduler,
    state: HarnessState,
}

impl BenchmarkHarness {
    pub fn new(config: BenchConfig) -> Result<BenchmarkHarness, RenderError> {
        config.validate()?;
        let viewport = Viewport::from_config(&config)?;
        let scheduler = TileScheduler::new(config.jobs)?;
        info!(
            "Benchmarking {}x{} over {} grain sizes with {} workers",
            config.width,
            config.height,
            config.grain_sizes.len(),
            scheduler.workers()
        );
        Ok(BenchmarkHarness {
            config,
            viewport,
            scheduler,
            state: HarnessState::Idle,
        })
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    fn transition(&mut self, state: HarnessState) {
        trace!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Renders the image once per grain size, timing each run, and returns
    /// the timings together with the last run's pixels.
    ///
    /// Each run is joined before the next one starts, so a timing never
    /// includes work from another grain size.
    pub fn run(&mut self) -> Result<(TimingSeries, PixelBuffer), RenderError> {
        let mut series = TimingSeries::default();
        let mut reference: Option<(u32, PixelBuffer)> = None;
        let mut last = None;

        for grain_size in self.config.grain_sizes.clone() {
            let mut buffer = PixelBuffer::new(self.config.width, self.config.height)?;

            self.transition(HarnessState::Rendering { grain_size });
            let start = Instant::now();
            self.scheduler.render(&self.viewport, &mut buffer, grain_size);
            let elapsed = start.elapsed();
            self.transition(HarnessState::Timed { grain_size });

            info!("grain size {grain_size}: {elapsed:.2?}");
            series.push(TimingRecord {
                grain_size,
                elapsed_seconds: elapsed.as_secs_f64(),
            });

            if self.config.verify {
                let mismatch = reference
                    .as_ref()
                    .filter(|(_, first)| *first != buffer)
                    .map(|(first_grain, _)| *first_grain);
                if let Some(first_grain) = mismatch {
                    return Err(RenderError::Inconsistent {
                        grain_size,
                        reference: first_grain,
                    });
                }
                if reference.is_none() {
                    reference = Some((grain_size, buffer.clone()));
                }
            }
            last = Some(buffer);
            self.transition(HarnessState::Idle);
        }

        let image = last.ok_or_else(|| {
            RenderError::InvalidConfig("no grain sizes to benchmark".to_string())
        })?;
        if let Some(fastest) = series.fastest() {
            info!(
                "Fastest grain size: {} ({:.6} s)",
                fastest.grain_size, fastest.elapsed_seconds
            );
        }
        self.transition(HarnessState::Done);
        Ok((series, image))
    }

    /// Runs the benchmark and hands the results to `sink`.
    /// Nothing reaches the sink unless every grain size rendered.
    pub fn run_into(&mut self, sink: &mut dyn OutputSink) -> Result<TimingSeries, RenderError> {
        let (series, image) = self.run()?;
        sink.persist(&image, &series)?;
        Ok(series)
    }
}
