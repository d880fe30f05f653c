//! Session tally of shadowing attempts and card marks

use chrono::{DateTime, Local};

#[derive(Clone, Debug)]
pub struct Attempt {
    pub at: DateTime<Local>,
    pub target: String,
    pub heard: String,
    pub percent: u8,
}

#[derive(Clone, Default, Debug)]
pub struct SessionStats {
    pub attempts: Vec<Attempt>,
    pub good: usize,
    pub again: usize,
}

impl SessionStats {
    pub fn record_attempt(&mut self, target: &str, heard: &str, percent: u8) {
        self.attempts.push(Attempt {
            at: Local::now(),
            target: target.to_string(),
            heard: heard.to_string(),
            percent,
        });
    }

    pub fn mark(&mut self, good: bool) {
        if good {
            self.good += 1;
        } else {
            self.again += 1;
        }
    }

    /// Multi-line summary for the end of a session
    pub fn summary(&self) -> String {
        let mut out = String::new();

        if !self.attempts.is_empty() {
            let (avg, min, max) = Self::calc(&self.attempts);
            out.push_str(&format!(
                "Shadowing (n={}): avg={:.0}% min={}% max={}%\n",
                self.attempts.len(),
                avg,
                min,
                max
            ));
            if let (Some(first), Some(last)) = (self.attempts.first(), self.attempts.last()) {
                out.push_str(&format!(
                    "  from {} to {}\n",
                    first.at.format("%H:%M:%S"),
                    last.at.format("%H:%M:%S")
                ));
            }
        }

        if self.good + self.again > 0 {
            out.push_str(&format!("Cards: good={} again={}\n", self.good, self.again));
        }

        if out.is_empty() {
            out.push_str("No attempts recorded yet.\n");
        }
        out
    }

    fn calc(attempts: &[Attempt]) -> (f64, u8, u8) {
        let total: u32 = attempts.iter().map(|a| a.percent as u32).sum();
        let avg = total as f64 / attempts.len() as f64;
        let min = attempts.iter().map(|a| a.percent).min().unwrap_or_default();
        let max = attempts.iter().map(|a| a.percent).max().unwrap_or_default();
        (avg, min, max)
    }
}
