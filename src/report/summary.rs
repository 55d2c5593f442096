use crate::core::event::Event;
use crate::core::types::RunId;
use std::collections::HashMap;
use std::fmt;

/// Aggregated figures of one machine over every run in a log
#[derive(Debug, Clone, PartialEq)]
pub struct MachineSummary {
    pub machine: String,
    pub runs: usize,
    pub ticks: u64,
    /// Parts pushed by the end of a run, averaged over runs
    pub mean_final_count: f64,
    pub mean_actual_speed: f64,
    /// Mean actual speed over ticks with neither tailback nor lack
    pub idle_free_throughput: f64,
    /// Fraction of ticks flagged as tailback
    pub tailback_share: f64,
    /// Fraction of ticks flagged as lack
    pub lack_share: f64,
}

impl MachineSummary {
    /// Fraction of ticks the machine was blocked or starved
    pub fn disturbed_share(&self) -> f64 {
        self.tailback_share + self.lack_share
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    final_counts: Vec<(RunId, f64)>,
    ticks: u64,
    speed_sum: f64,
    undisturbed_ticks: u64,
    undisturbed_speed_sum: f64,
    tailbacks: u64,
    lacks: u64,
}

impl Accumulator {
    fn record(&mut self, event: &Event) {
        self.ticks += 1;
        self.speed_sum += event.actual_speed;
        self.tailbacks += u64::from(event.tailback);
        self.lacks += u64::from(event.lack);
        if !event.tailback && !event.lack {
            self.undisturbed_ticks += 1;
            self.undisturbed_speed_sum += event.actual_speed;
        }
        match self.final_counts.iter_mut().find(|(run, _)| *run == event.run) {
            Some(entry) => entry.1 = event.count,
            None => self.final_counts.push((event.run, event.count)),
        }
    }

    fn finish(self, machine: String) -> MachineSummary {
        let runs = self.final_counts.len();
        let ticks = self.ticks as f64;
        let share = |n: u64| if self.ticks == 0 { 0.0 } else { n as f64 / ticks };
        MachineSummary {
            machine,
            runs,
            ticks: self.ticks,
            mean_final_count: if runs == 0 {
                0.0
            } else {
                self.final_counts.iter().map(|(_, count)| count).sum::<f64>() / runs as f64
            },
            mean_actual_speed: if self.ticks == 0 { 0.0 } else { self.speed_sum / ticks },
            idle_free_throughput: if self.undisturbed_ticks == 0 {
                0.0
            } else {
                self.undisturbed_speed_sum / self.undisturbed_ticks as f64
            },
            tailback_share: share(self.tailbacks),
            lack_share: share(self.lacks),
        }
    }
}

/// Per-machine view of an event log, machines in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSummary {
    pub machines: Vec<MachineSummary>,
}

impl LineSummary {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut accumulators: HashMap<String, Accumulator> = HashMap::new();

        for event in events {
            let accumulator = accumulators.entry(event.machine.clone()).or_insert_with(|| {
                order.push(event.machine.clone());
                Accumulator::default()
            });
            accumulator.record(event);
        }

        let machines = order
            .into_iter()
            .filter_map(|name| {
                accumulators
                    .remove(&name)
                    .map(|accumulator| accumulator.finish(name))
            })
            .collect();
        Self { machines }
    }

    pub fn machine(&self, name: &str) -> Option<&MachineSummary> {
        self.machines.iter().find(|summary| summary.machine == name)
    }

    /// The machine that is least often blocked or starved; ties go to the
    /// one with lower throughput.
    pub fn bottleneck_candidate(&self) -> Option<&MachineSummary> {
        self.machines.iter().min_by(|a, b| {
            a.disturbed_share()
                .total_cmp(&b.disturbed_share())
                .then(a.mean_final_count.total_cmp(&b.mean_final_count))
        })
    }
}

impl fmt::Display for LineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<14} {:>5} {:>14} {:>12} {:>12} {:>9} {:>7}",
            "Machine", "Runs", "Final count", "Mean speed", "Idle-free", "Tailback", "Lack"
        )?;
        for summary in &self.machines {
            writeln!(
                f,
                "{:<14} {:>5} {:>14.1} {:>12.1} {:>12.1} {:>8.1}% {:>6.1}%",
                summary.machine,
                summary.runs,
                summary.mean_final_count,
                summary.mean_actual_speed,
                summary.idle_free_throughput,
                summary.tailback_share * 100.0,
                summary.lack_share * 100.0
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(tick: u64, machine: &str, run: RunId, speed: f64, count: f64) -> Event {
        Event {
            tick,
            machine: machine.to_string(),
            state: 128,
            requested_speed: speed,
            actual_speed: speed,
            count,
            tailback: false,
            lack: false,
            run,
        }
    }

    #[test]
    fn test_machines_in_first_appearance_order() {
        let events = vec![
            event(0, "Filler", 1, 10.0, 10.0),
            event(0, "Capper", 1, 5.0, 5.0),
            event(1, "Filler", 1, 10.0, 20.0),
            event(1, "Capper", 1, 5.0, 10.0),
        ];
        let summary = LineSummary::from_events(&events);
        let names: Vec<&str> = summary.machines.iter().map(|m| m.machine.as_str()).collect();
        assert_eq!(names, vec!["Filler", "Capper"]);
    }

    #[test]
    fn test_final_count_averaged_over_runs() {
        let events = vec![
            event(0, "Filler", 1, 10.0, 10.0),
            event(1, "Filler", 1, 20.0, 30.0),
            event(0, "Filler", 2, 50.0, 50.0),
            event(1, "Filler", 2, 0.0, 50.0),
        ];
        let summary = LineSummary::from_events(&events);
        let filler = summary.machine("Filler").unwrap();
        assert_eq!(filler.runs, 2);
        assert_eq!(filler.ticks, 4);
        assert_eq!(filler.mean_final_count, 40.0);
        assert_eq!(filler.mean_actual_speed, 20.0);
    }

    #[test]
    fn test_flag_shares() {
        let mut events = vec![
            event(0, "Packer", 1, 0.0, 0.0),
            event(1, "Packer", 1, 0.0, 0.0),
            event(2, "Packer", 1, 0.0, 0.0),
            event(3, "Packer", 1, 0.0, 0.0),
        ];
        events[0].lack = true;
        events[1].lack = true;
        events[2].tailback = true;
        let summary = LineSummary::from_events(&events);
        let packer = summary.machine("Packer").unwrap();
        assert_eq!(packer.lack_share, 0.5);
        assert_eq!(packer.tailback_share, 0.25);
    }

    #[test]
    fn test_idle_free_throughput_skips_flagged_ticks() {
        let mut events = vec![
            event(0, "Capper", 1, 600.0, 600.0),
            event(1, "Capper", 1, 100.0, 700.0),
            event(2, "Capper", 1, 0.0, 700.0),
            event(3, "Capper", 1, 800.0, 1500.0),
        ];
        events[1].lack = true;
        events[2].tailback = true;
        let summary = LineSummary::from_events(&events);
        let capper = summary.machine("Capper").unwrap();
        assert_eq!(capper.mean_actual_speed, 375.0);
        assert_eq!(capper.idle_free_throughput, 700.0);
    }

    #[test]
    fn test_bottleneck_is_least_disturbed_machine() {
        let mut events = vec![
            event(0, "Filler", 1, 10.0, 10.0),
            event(0, "Pasteurizer", 1, 10.0, 10.0),
            event(0, "Capper", 1, 10.0, 10.0),
        ];
        events[0].tailback = true;
        events[2].lack = true;
        let summary = LineSummary::from_events(&events);
        assert_eq!(summary.bottleneck_candidate().unwrap().machine, "Pasteurizer");
    }

    #[test]
    fn test_bottleneck_tie_goes_to_lower_throughput() {
        let events = vec![
            event(0, "Filler", 1, 10.0, 900.0),
            event(0, "Capper", 1, 10.0, 300.0),
        ];
        let summary = LineSummary::from_events(&events);
        assert_eq!(summary.bottleneck_candidate().unwrap().machine, "Capper");
    }

    #[test]
    fn test_empty_log() {
        let summary = LineSummary::from_events(&Vec::<Event>::new());
        assert!(summary.machines.is_empty());
        assert!(summary.bottleneck_candidate().is_none());
    }
}
