//! Dimensions and the shared dimension table.
//!
//! Two dimensions are the same dimension only if their names match and the
//! owning variables read from an identical file chain; coordinate arrays
//! and min/max are computed at most once per such identity and shared.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use view_common::{ViewError, ViewResult};

use crate::chain::FileChain;

/// One axis of a variable, with lazily computed per-index coordinates.
pub struct Dimension {
    /// Dimension name.
    pub name: String,
    /// Units string, if declared.
    pub units: Option<String>,
    /// Calendar tag, if declared.
    pub calendar: Option<String>,
    /// Aggregate extent across the chain.
    pub size: usize,
    /// Whether this is the record (concatenation) axis.
    pub is_record: bool,
    /// Whether coordinate values are instants in time.
    pub time_like: bool,

    chain: FileChain,
    values: OnceCell<Rc<Vec<f64>>>,
    range: OnceCell<(f64, f64)>,
}

impl Dimension {
    /// Build a dimension bound to the chain it reads from. Units, calendar
    /// and the time-like flag come from the first file.
    pub fn open(name: &str, size: usize, is_record: bool, chain: FileChain) -> Self {
        let (units, calendar) = match chain.get(0) {
            Some(slab) => (
                slab.reader.dim_units(name),
                slab.reader.dim_calendar(name),
            ),
            None => (None, None),
        };
        let time_like = name == "time"
            || units
                .as_deref()
                .map(|u| u.contains(" since "))
                .unwrap_or(false);

        Self {
            name: name.to_string(),
            units,
            calendar,
            size,
            is_record,
            time_like,
            chain,
            values: OnceCell::new(),
            range: OnceCell::new(),
        }
    }

    /// Per-index coordinate array, computed once and shared. Record axes
    /// translate each global index into the owning file; other axes are
    /// uniform across the chain and read from the first file.
    pub fn values(&self) -> ViewResult<Rc<Vec<f64>>> {
        if let Some(values) = self.values.get() {
            return Ok(Rc::clone(values));
        }

        let mut computed = Vec::with_capacity(self.size);
        for index in 0..self.size {
            let (ordinal, local) = if self.is_record {
                self.chain.translate(index)?
            } else {
                (0, index)
            };
            let slab = self.chain.get(ordinal).ok_or_else(|| {
                ViewError::ReadFailed(format!("missing file {} for '{}'", ordinal, self.name))
            })?;
            computed.push(slab.reader.coord_value(&self.name, local)?);
        }

        let values = Rc::new(computed);
        let _ = self.values.set(Rc::clone(&values));
        Ok(values)
    }

    /// Cached coordinate min/max.
    pub fn range(&self) -> ViewResult<(f64, f64)> {
        if let Some(range) = self.range.get() {
            return Ok(*range);
        }
        let values = self.values()?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values.iter() {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        let range = (min, max);
        let _ = self.range.set(range);
        Ok(range)
    }

    /// Human-readable label for one coordinate value. Time-like dimensions
    /// with a standard (or absent) calendar format as UTC timestamps; other
    /// calendars and plain dimensions fall back to the numeric value with
    /// units.
    pub fn label(&self, value: f64) -> String {
        if self.time_like && self.calendar_is_standard() {
            if let Some(units) = &self.units {
                if let Some(instant) = decode_time(value, units) {
                    return instant.format("%Y-%m-%d %H:%M:%S").to_string();
                }
            }
        }
        match &self.units {
            Some(units) => format!("{} {}", value, units),
            None => format!("{}", value),
        }
    }

    fn calendar_is_standard(&self) -> bool {
        match self.calendar.as_deref() {
            None => true,
            Some(c) => {
                let c = c.to_lowercase();
                c == "standard" || c == "gregorian" || c == "proleptic_gregorian"
            }
        }
    }
}

/// Decode a CF-style "unit since epoch" coordinate into an instant.
fn decode_time(value: f64, units: &str) -> Option<DateTime<Utc>> {
    let mut parts = units.splitn(2, " since ");
    let unit = parts.next()?.trim().to_lowercase();
    let epoch_str = parts.next()?.trim();

    let seconds_per_unit = match unit.as_str() {
        "seconds" | "second" | "secs" | "s" => 1.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        "hours" | "hour" | "hrs" | "h" => 3600.0,
        "days" | "day" | "d" => 86400.0,
        _ => return None,
    };

    let epoch = parse_epoch(epoch_str)?;
    let offset_ms = (value * seconds_per_unit * 1000.0).round() as i64;
    Some(epoch + Duration::milliseconds(offset_ms))
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Identity key of a dimension: name plus the chain fingerprint of the
/// owning variable.
pub type DimKey = (String, u64);

/// Shared table of dimensions keyed by composite identity, so coordinate
/// computation and min/max happen at most once per identical dimension.
#[derive(Default)]
pub struct DimensionTable {
    entries: HashMap<DimKey, Rc<Dimension>>,
}

impl DimensionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the shared dimension for (name, chain), building it on first
    /// use.
    pub fn get_or_open(
        &mut self,
        name: &str,
        size: usize,
        is_record: bool,
        chain: &FileChain,
    ) -> Rc<Dimension> {
        let key = (name.to_string(), chain.fingerprint());
        if let Some(existing) = self.entries.get(&key) {
            return Rc::clone(existing);
        }
        let dim = Rc::new(Dimension::open(name, size, is_record, chain.clone()));
        self.entries.insert(key, Rc::clone(&dim));
        dim
    }

    /// Look up an already-opened dimension.
    pub fn get(&self, name: &str, fingerprint: u64) -> Option<Rc<Dimension>> {
        self.entries.get(&(name.to_string(), fingerprint)).cloned()
    }

    /// Number of distinct dimensions in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_time_days() {
        let t = decode_time(31.0, "days since 2000-01-01").unwrap();
        assert_eq!(t.format("%Y-%m-%d").to_string(), "2000-02-01");
    }

    #[test]
    fn test_decode_time_hours_with_clock() {
        let t = decode_time(6.0, "hours since 1900-01-01 12:00:00").unwrap();
        assert_eq!(t.format("%Y-%m-%d %H:%M:%S").to_string(), "1900-01-01 18:00:00");
    }

    #[test]
    fn test_decode_time_unknown_unit() {
        assert!(decode_time(1.0, "fortnights since 2000-01-01").is_none());
        assert!(decode_time(1.0, "degrees_east").is_none());
    }
}
