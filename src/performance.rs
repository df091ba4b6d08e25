use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Performance statistics tracker
///
/// Doubles as the frame clock: `record_frame` returns the time since the
/// previous frame, which drives the marquee and the other time-based state.
#[derive(Debug, Clone)]
pub struct PerformanceStats {
    // Frame timing
    frame_times: VecDeque<Duration>,
    last_frame_time: Instant,
    max_frame_samples: usize,

    // General
    app_start_time: Instant,

    // Render timing
    render_times: VecDeque<Duration>,
    max_render_samples: usize,

    // Event processing
    event_process_times: VecDeque<Duration>,
    events_processed: u64,
    max_event_samples: usize,

    // Page
    visible_blocks: usize,
    animating_blocks: usize,
    carousel_ticks: u64,
}

impl Default for PerformanceStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceStats {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(60),
            last_frame_time: now,
            max_frame_samples: 60,

            app_start_time: now,

            render_times: VecDeque::with_capacity(60),
            max_render_samples: 60,

            event_process_times: VecDeque::with_capacity(100),
            events_processed: 0,
            max_event_samples: 100,

            visible_blocks: 0,
            animating_blocks: 0,
            carousel_ticks: 0,
        }
    }

    /// Record a frame at `now` and return the time since the previous one
    pub fn record_frame(&mut self, now: Instant) -> Duration {
        let frame_time = now.saturating_duration_since(self.last_frame_time);

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > self.max_frame_samples {
            self.frame_times.pop_front();
        }

        self.last_frame_time = now;
        frame_time
    }

    /// Get current FPS
    pub fn fps(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total.as_secs_f64() / self.frame_times.len() as f64;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    /// Get average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let total: Duration = self.frame_times.iter().sum();
        total.as_secs_f64() * 1000.0 / self.frame_times.len() as f64
    }

    /// Get maximum frame time in milliseconds
    pub fn max_frame_time_ms(&self) -> f64 {
        self.frame_times
            .iter()
            .max()
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    /// Record total render time for a frame
    pub fn record_render_time(&mut self, duration: Duration) {
        self.render_times.push_back(duration);
        if self.render_times.len() > self.max_render_samples {
            self.render_times.pop_front();
        }
    }

    /// Get average render time in milliseconds
    pub fn avg_render_time_ms(&self) -> f64 {
        if self.render_times.is_empty() {
            return 0.0;
        }
        let total: Duration = self.render_times.iter().sum();
        total.as_secs_f64() * 1000.0 / self.render_times.len() as f64
    }

    /// Get max render time in milliseconds
    pub fn max_render_time_ms(&self) -> f64 {
        self.render_times
            .iter()
            .max()
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    /// Record event processing time
    pub fn record_event_process_time(&mut self, duration: Duration) {
        self.event_process_times.push_back(duration);
        if self.event_process_times.len() > self.max_event_samples {
            self.event_process_times.pop_front();
        }
        self.events_processed += 1;
    }

    /// Get average event process time in microseconds
    pub fn avg_event_process_time_us(&self) -> f64 {
        if self.event_process_times.is_empty() {
            return 0.0;
        }
        let total: Duration = self.event_process_times.iter().sum();
        total.as_secs_f64() * 1_000_000.0 / self.event_process_times.len() as f64
    }

    pub fn total_events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Update page gauges (blocks on screen, blocks mid-transition)
    pub fn update_page_stats(&mut self, visible_blocks: usize, animating_blocks: usize) {
        self.visible_blocks = visible_blocks;
        self.animating_blocks = animating_blocks;
    }

    pub fn record_carousel_tick(&mut self) {
        self.carousel_ticks += 1;
    }

    pub fn visible_blocks(&self) -> usize {
        self.visible_blocks
    }

    pub fn animating_blocks(&self) -> usize {
        self.animating_blocks
    }

    pub fn carousel_ticks(&self) -> u64 {
        self.carousel_ticks
    }

    /// Get app uptime
    pub fn uptime(&self) -> Duration {
        self.last_frame_time.saturating_duration_since(self.app_start_time)
    }

    /// Format uptime as HH:MM:SS
    pub fn uptime_formatted(&self) -> String {
        let uptime = self.uptime();
        let hours = uptime.as_secs() / 3600;
        let minutes = (uptime.as_secs() % 3600) / 60;
        let seconds = uptime.as_secs() % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}
