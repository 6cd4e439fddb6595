//! The registry of chart traces and their metric bindings. Built once at
//! startup; the refresh service republishes every trace from each fetch.

use crate::config::Config;
use crate::db::{FanControlEvent, SensorReading};
use crate::trace::{format_timestamps, trailing_average, Trace, TracePoints};

struct SensorMetric {
    trace: Trace,
    value: fn(&SensorReading) -> f64,
}

impl SensorMetric {
    fn new(name: &'static str, color: &'static str, value: fn(&SensorReading) -> f64) -> Self {
        Self {
            trace: Trace::new(name, color),
            value,
        }
    }
}

struct FanMetric {
    trace: Trace,
    value: Box<dyn Fn(&FanControlEvent) -> f64 + Send + Sync>,
}

pub struct Charts {
    temperatures: Vec<SensorMetric>,
    fan_power: Vec<FanMetric>,
    fan_rpm: Vec<SensorMetric>,
    window: usize,
}

impl Charts {
    pub fn new(config: &Config) -> Self {
        let nominal = config.auto_nominal_percent;
        Self {
            temperatures: vec![
                SensorMetric::new("Inlet", "#38bdf8", |r| r.temp_inlet),
                SensorMetric::new("Exhaust", "#818cf8", |r| r.temp_exhaust),
                SensorMetric::new("CPU 1", "#fbbf24", |r| r.temp_cpu1),
                SensorMetric::new("CPU 2", "#f87171", |r| r.temp_cpu2),
            ],
            fan_power: vec![FanMetric {
                trace: Trace::new("Fan power (%)", "#4ade80"),
                // The BMC owns the duty cycle in auto mode; chart the
                // nominal percent instead of the stale stored value.
                value: Box::new(move |event| {
                    if event.auto {
                        nominal
                    } else {
                        event.percent
                    }
                }),
            }],
            fan_rpm: vec![
                SensorMetric::new("Fan 1 RPM", "#38bdf8", |r| r.rpm_fan1),
                SensorMetric::new("Fan 2 RPM", "#818cf8", |r| r.rpm_fan2),
                SensorMetric::new("Fan 3 RPM", "#fbbf24", |r| r.rpm_fan3),
                SensorMetric::new("Fan 4 RPM", "#f87171", |r| r.rpm_fan4),
                SensorMetric::new("Fan 5 RPM", "#4ade80", |r| r.rpm_fan5),
                SensorMetric::new("Fan 6 RPM", "#c084fc", |r| r.rpm_fan6),
            ],
            window: config.smoothing_window.max(1),
        }
    }

    /// Republishes every temperature and RPM trace from one sensor fetch.
    /// The x labels are formatted once and shared across all eleven traces.
    pub fn rebuild_sensor_traces(&self, readings: &[SensorReading]) {
        let xs = format_timestamps(readings);
        for metric in self.temperatures.iter().chain(self.fan_rpm.iter()) {
            let values: Vec<f64> = readings.iter().map(metric.value).collect();
            metric.trace.publish(TracePoints {
                x: xs.clone(),
                y: trailing_average(&values, self.window),
            });
        }
    }

    pub fn rebuild_fan_traces(&self, events: &[FanControlEvent]) {
        let xs = format_timestamps(events);
        for metric in &self.fan_power {
            let values: Vec<f64> = events.iter().map(|event| (metric.value)(event)).collect();
            metric.trace.publish(TracePoints {
                x: xs.clone(),
                y: trailing_average(&values, self.window),
            });
        }
    }

    pub fn temperature_traces(&self) -> impl Iterator<Item = &Trace> {
        self.temperatures.iter().map(|metric| &metric.trace)
    }

    pub fn fan_power_traces(&self) -> impl Iterator<Item = &Trace> {
        self.fan_power.iter().map(|metric| &metric.trace)
    }

    pub fn fan_rpm_traces(&self) -> impl Iterator<Item = &Trace> {
        self.fan_rpm.iter().map(|metric| &metric.trace)
    }
}
