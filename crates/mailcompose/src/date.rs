//! RFC 5322 date formatting: `Mon, 02 Jan 2006 15:04:05 -0700`.

use chrono::{DateTime, TimeZone};

/// Formats `t` as an RFC 5322 date-time. Unlike `chrono`'s built-in
/// `to_rfc2822`, this fixes the day-of-month to two digits, matching the
/// RFC 5322's grammar exactly.
pub fn format_date<Tz: TimeZone>(t: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn formats_a_known_instant() {
        let t = Utc.with_ymd_and_hms(2014, 6, 25, 17, 46, 0).unwrap();
        assert_eq!(format_date(t), "Wed, 25 Jun 2014 17:46:00 +0000");
    }

    #[test]
    fn pads_single_digit_day() {
        let t = Utc.with_ymd_and_hms(2014, 6, 5, 0, 0, 0).unwrap();
        assert_eq!(format_date(t), "Wed, 05 Jun 2014 00:00:00 +0000");
    }
}
