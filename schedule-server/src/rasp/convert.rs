//! Conversion from Rasp JSON types to domain types.
//!
//! Records that lack the fields a domain type requires are dropped here
//! rather than reported: the API routinely returns partial entries.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};
use tracing::debug;

use crate::domain::{
    Carrier, CarrierCodes, Copyright, RouteSegment, Thread, ThreadStop, UNTITLED_CARRIER,
};

use super::types::{
    CarrierDto, CarrierResponse, CopyrightResponse, ScheduleResponse, SegmentDto,
    SegmentsResponse, StopDto, ThreadResponse,
};

/// Offset assumed for timestamps the API sends without one (Moscow time).
const DEFAULT_OFFSET_SECS: i32 = 3 * 60 * 60;

const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an API timestamp.
///
/// Accepts RFC 3339 (`2025-08-01T07:15:00+03:00`) and the offset-less
/// `2025-08-01 07:15:00` form, which is taken to be Moscow time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    let naive = NaiveDateTime::parse_from_str(s, NAIVE_FORMAT).ok()?;
    let offset = FixedOffset::east_opt(DEFAULT_OFFSET_SECS)?;
    naive.and_local_timezone(offset).single()
}

/// Parse an API timestamp as a local wall-clock time, discarding any offset.
pub fn parse_local_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, NAIVE_FORMAT).ok()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A non-negative number of seconds. Values chrono can't represent count
/// as absent.
fn seconds(value: Option<f64>) -> Option<Duration> {
    value
        .filter(|s| s.is_finite() && *s >= 0.0)
        .and_then(|s| Duration::try_seconds(s.round() as i64))
}

/// Convert a carrier record. A missing title becomes [`UNTITLED_CARRIER`].
pub fn convert_carrier(dto: &CarrierDto) -> Carrier {
    let codes = dto.codes.as_ref();
    Carrier {
        title: non_empty(&dto.title).unwrap_or_else(|| UNTITLED_CARRIER.to_string()),
        codes: CarrierCodes {
            iata: codes.and_then(|c| non_empty(&c.iata)),
            icao: codes.and_then(|c| non_empty(&c.icao)),
            sirena: codes.and_then(|c| non_empty(&c.sirena)),
            internal: dto.code.as_ref().map(|c| c.to_string()),
        },
        logo: non_empty(&dto.logo),
        url: non_empty(&dto.url),
        email: non_empty(&dto.email),
        phone: non_empty(&dto.phone),
        address: non_empty(&dto.address),
        contacts: non_empty(&dto.contacts),
    }
}

/// Pick the carrier out of a `/carrier/` response.
///
/// Prefers the single `carrier` field, then the first of `carriers`.
pub fn convert_carrier_response(response: &CarrierResponse) -> Option<Carrier> {
    response
        .carrier
        .as_ref()
        .or_else(|| response.carriers.as_ref().and_then(|all| all.first()))
        .map(convert_carrier)
}

/// Convert a search segment.
///
/// Returns `None` when the thread, departure or arrival is missing or
/// unparseable. A segment without carrier data gets the railway placeholder.
pub fn convert_segment(dto: &SegmentDto) -> Option<RouteSegment> {
    let thread = dto.thread.as_ref()?;
    let departure = parse_timestamp(dto.departure.as_deref()?)?;
    let arrival = parse_timestamp(dto.arrival.as_deref()?)?;

    let carrier = thread
        .carrier
        .as_ref()
        .map(convert_carrier)
        .unwrap_or_else(Carrier::railway_placeholder);

    let duration = seconds(dto.duration).unwrap_or_else(|| arrival - departure);

    Some(RouteSegment {
        thread_uid: non_empty(&thread.uid),
        thread_title: non_empty(&thread.title),
        thread_number: non_empty(&thread.number),
        transport_type: non_empty(&thread.transport_type),
        carrier,
        departure,
        arrival,
        duration,
        has_transfers: dto.has_transfers,
    })
}

/// Convert every usable segment in a search response, preserving order.
pub fn convert_segments(response: &SegmentsResponse) -> Vec<RouteSegment> {
    let raw = response.segments.as_deref().unwrap_or_default();
    let segments: Vec<RouteSegment> = raw.iter().filter_map(convert_segment).collect();

    if segments.len() < raw.len() {
        debug!(
            received = raw.len(),
            kept = segments.len(),
            "Dropped incomplete segments"
        );
    }

    segments
}

fn convert_stop(dto: &StopDto) -> Option<ThreadStop> {
    let station = dto.station.as_ref()?;
    Some(ThreadStop {
        station_code: non_empty(&station.code)?,
        station_title: non_empty(&station.title)?,
        arrival: dto.arrival.as_deref().and_then(parse_local_time),
        departure: dto.departure.as_deref().and_then(parse_local_time),
        stop_time: seconds(dto.stop_time),
        platform: non_empty(&dto.platform),
    })
}

/// Convert a `/thread/` response.
///
/// `requested_uid` is used when the response does not echo its uid. Stops
/// without a station code or title are dropped.
pub fn convert_thread(response: &ThreadResponse, requested_uid: &str) -> Thread {
    Thread {
        uid: non_empty(&response.uid).unwrap_or_else(|| requested_uid.to_string()),
        title: non_empty(&response.title),
        number: non_empty(&response.number),
        transport_type: non_empty(&response.transport_type),
        carrier: response.carrier.as_ref().map(convert_carrier),
        stops: response
            .stops
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(convert_stop)
            .collect(),
    }
}

/// Thread uids in a station schedule, in schedule order.
pub fn schedule_thread_uids(response: &ScheduleResponse) -> Vec<String> {
    response
        .schedule
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| non_empty(&entry.thread.as_ref()?.uid))
        .collect()
}

/// Convert a `/copyright/` response. `None` when it carries no copyright
/// object at all.
pub fn convert_copyright(response: &CopyrightResponse) -> Option<Copyright> {
    let dto = response.copyright.as_ref()?;
    Some(Copyright::new(
        dto.text.as_deref(),
        dto.url.as_deref(),
        dto.logo_hm.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CodeSystem, MISSING_COPYRIGHT_TEXT, RAILWAY_PLACEHOLDER};
    use crate::rasp::types::{
        CarrierCodesDto, CodeValue, CopyrightDto, ScheduleEntryDto, StationRefDto, ThreadRefDto,
    };
    use chrono::Timelike;

    fn segment(departure: Option<&str>, arrival: Option<&str>) -> SegmentDto {
        SegmentDto {
            thread: Some(ThreadRefDto {
                uid: Some("uid-1".into()),
                title: Some("Москва — Тверь".into()),
                ..Default::default()
            }),
            departure: departure.map(String::from),
            arrival: arrival.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn timestamp_rfc3339() {
        let dt = parse_timestamp("2025-08-01T07:15:00+03:00").unwrap();
        assert_eq!(dt.hour(), 7);
        assert_eq!(dt.offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn timestamp_without_offset_is_moscow_time() {
        let dt = parse_timestamp("2025-08-01 00:25:00").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 25);
        assert_eq!(dt.offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn timestamp_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("07:15").is_none());
    }

    #[test]
    fn local_time_keeps_wall_clock() {
        let t = parse_local_time("2025-08-01T23:10:00+05:00").unwrap();
        assert_eq!(t.hour(), 23);
        let t = parse_local_time("2025-08-01 23:10:00").unwrap();
        assert_eq!(t.hour(), 23);
    }

    #[test]
    fn segment_requires_thread_and_times() {
        assert!(convert_segment(&segment(None, Some("2025-08-01T09:00:00+03:00"))).is_none());
        assert!(convert_segment(&segment(Some("2025-08-01T09:00:00+03:00"), None)).is_none());
        assert!(convert_segment(&segment(Some("soon"), Some("later"))).is_none());

        let mut no_thread = segment(
            Some("2025-08-01T07:00:00+03:00"),
            Some("2025-08-01T09:00:00+03:00"),
        );
        no_thread.thread = None;
        assert!(convert_segment(&no_thread).is_none());
    }

    #[test]
    fn segment_without_carrier_gets_placeholder() {
        let converted = convert_segment(&segment(
            Some("2025-08-01T07:00:00+03:00"),
            Some("2025-08-01T09:30:00+03:00"),
        ))
        .unwrap();
        assert_eq!(converted.carrier.title, RAILWAY_PLACEHOLDER);
        // No duration in the payload: derived from the timestamps
        assert_eq!(converted.duration, Duration::minutes(150));
        assert_eq!(converted.thread_uid.as_deref(), Some("uid-1"));
    }

    #[test]
    fn segment_duration_from_payload() {
        let mut dto = segment(
            Some("2025-08-01T07:00:00+03:00"),
            Some("2025-08-01T09:30:00+03:00"),
        );
        dto.duration = Some(9000.0);
        dto.has_transfers = Some(true);
        let converted = convert_segment(&dto).unwrap();
        assert_eq!(converted.duration, Duration::seconds(9000));
        assert_eq!(converted.has_transfers, Some(true));
    }

    #[test]
    fn segment_duration_out_of_range_uses_timestamps() {
        let json = r#"{"segments":[{
            "thread": {"uid": "u1"},
            "departure": "2025-08-01T07:15:00+03:00",
            "arrival": "2025-08-01T09:15:00+03:00",
            "duration": 1e20
        }]}"#;
        let response: SegmentsResponse = serde_json::from_str(json).unwrap();
        let segments = convert_segments(&response);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].duration, Duration::hours(2));
    }

    #[test]
    fn stop_time_out_of_range_is_absent() {
        assert_eq!(seconds(Some(1e20)), None);
        assert_eq!(seconds(Some(-5.0)), None);
        assert_eq!(seconds(Some(f64::NAN)), None);
        assert_eq!(seconds(Some(59.6)), Some(Duration::seconds(60)));
    }

    #[test]
    fn carrier_codes_and_title() {
        let dto = CarrierDto {
            code: Some(CodeValue::Number(26)),
            title: None,
            codes: Some(CarrierCodesDto {
                iata: Some(String::new()),
                icao: Some("AFL".into()),
                sirena: None,
            }),
            ..Default::default()
        };
        let carrier = convert_carrier(&dto);
        assert_eq!(carrier.title, UNTITLED_CARRIER);
        assert_eq!(carrier.codes.iata, None);
        assert_eq!(carrier.codes.preferred(), Some((CodeSystem::Icao, "AFL")));
        assert_eq!(carrier.codes.internal.as_deref(), Some("26"));
    }

    #[test]
    fn carrier_response_prefers_single_carrier() {
        let named = |t: &str| CarrierDto {
            title: Some(t.into()),
            ..Default::default()
        };
        let response = CarrierResponse {
            carrier: Some(named("Один")),
            carriers: Some(vec![named("Два")]),
        };
        assert_eq!(convert_carrier_response(&response).unwrap().title, "Один");

        let response = CarrierResponse {
            carrier: None,
            carriers: Some(vec![named("Два"), named("Три")]),
        };
        assert_eq!(convert_carrier_response(&response).unwrap().title, "Два");

        let response = CarrierResponse {
            carrier: None,
            carriers: Some(vec![]),
        };
        assert!(convert_carrier_response(&response).is_none());
    }

    #[test]
    fn thread_drops_incomplete_stops() {
        let stop = |code: Option<&str>, title: Option<&str>| StopDto {
            station: Some(StationRefDto {
                code: code.map(String::from),
                title: title.map(String::from),
                ..Default::default()
            }),
            departure: Some("2025-08-01 07:00:00".into()),
            stop_time: Some(120.0),
            ..Default::default()
        };
        let response = ThreadResponse {
            uid: None,
            title: Some("Москва — Тверь".into()),
            stops: Some(vec![
                stop(Some("s1"), Some("Москва (Ленинградский вокзал)")),
                stop(None, Some("Без кода")),
                stop(Some("s3"), None),
                stop(Some("s4"), Some("Тверь")),
            ]),
            ..Default::default()
        };

        let thread = convert_thread(&response, "requested-uid");
        assert_eq!(thread.uid, "requested-uid");
        assert_eq!(thread.stops.len(), 2);
        assert_eq!(thread.origin().unwrap().station_code, "s1");
        assert_eq!(thread.terminus().unwrap().station_title, "Тверь");
        assert_eq!(thread.stops[0].stop_time, Some(Duration::minutes(2)));
    }

    #[test]
    fn schedule_uids_in_order() {
        let entry = |uid: Option<&str>| ScheduleEntryDto {
            thread: Some(ThreadRefDto {
                uid: uid.map(String::from),
                ..Default::default()
            }),
            ..Default::default()
        };
        let response = ScheduleResponse {
            station: None,
            schedule: Some(vec![entry(Some("a")), entry(None), entry(Some("b"))]),
        };
        assert_eq!(schedule_thread_uids(&response), vec!["a", "b"]);
    }

    #[test]
    fn copyright_without_text() {
        let response = CopyrightResponse {
            copyright: Some(CopyrightDto {
                url: Some("http://rasp.yandex.ru/".into()),
                ..Default::default()
            }),
        };
        let copyright = convert_copyright(&response).unwrap();
        assert_eq!(copyright.text, MISSING_COPYRIGHT_TEXT);
        assert_eq!(copyright.url.as_deref(), Some("http://rasp.yandex.ru/"));

        assert!(convert_copyright(&CopyrightResponse::default()).is_none());
    }
}
