// Unit tests for domain models

use super::*;
use std::path::PathBuf;

#[test]
fn test_time_spec_parse_seconds() {
    let time = TimeSpec::parse("123.456").unwrap();
    assert_eq!(time.as_seconds(), 123.456);
}

#[test]
fn test_time_spec_parse_mm_ss() {
    let time = TimeSpec::parse("01:30.5").unwrap();
    assert_eq!(time.as_seconds(), 90.5);
}

#[test]
fn test_time_spec_parse_hh_mm_ss() {
    let time = TimeSpec::parse("01:02:03").unwrap();
    assert_eq!(time.as_seconds(), 3723.0);
}

#[test]
fn test_time_spec_parse_invalid() {
    assert!(TimeSpec::parse("invalid").is_err());
    assert!(TimeSpec::parse("00:60").is_err());
    assert!(TimeSpec::parse("1:60:00").is_err());
    assert!(TimeSpec::parse("-10").is_err());
    assert!(TimeSpec::parse("inf").is_err());
    assert!(TimeSpec::parse("1:2:3:4").is_err());
}

#[test]
fn test_time_spec_display() {
    assert_eq!(TimeSpec::from_seconds(3723.456).to_string(), "1:02:03.456");
    assert_eq!(TimeSpec::from_seconds(123.456).to_string(), "02:03.456");
    assert_eq!(TimeSpec::from_seconds(0.0).to_string(), "00:00.000");
}

#[test]
fn test_chunk_size_rejects_non_positive() {
    assert!(ChunkSize::new(0.0).is_err());
    assert!(ChunkSize::new(-5.0).is_err());
    assert!(ChunkSize::new(f64::NAN).is_err());
    assert!(ChunkSize::new(f64::INFINITY).is_err());
    assert_eq!(ChunkSize::new(0.5).unwrap().seconds(), 0.5);
}

#[test]
fn test_chunk_size_parse_and_default() {
    assert_eq!(ChunkSize::default().seconds(), 30.0);
    assert_eq!(ChunkSize::parse("45").unwrap().seconds(), 45.0);
    assert_eq!(ChunkSize::parse("1:30").unwrap().seconds(), 90.0);

    let err = ChunkSize::parse("0").unwrap_err();
    assert!(err.is_validation());
    assert!(ChunkSize::parse("abc").unwrap_err().is_validation());
}

#[test]
fn test_media_duration_validation() {
    assert!(MediaDuration::new(0.0).unwrap().is_zero());
    assert!(matches!(
        MediaDuration::new(-1.0),
        Err(DomainError::ProbeFailed(_))
    ));
    assert!(MediaDuration::new(f64::NAN).is_err());
}

#[test]
fn test_segment_effective_length_is_clipped() {
    let total = MediaDuration::new(95.0).unwrap();
    let chunk = ChunkSize::new(30.0).unwrap();

    let full = Segment { index: 1, start: 0.0, length: chunk };
    let last = Segment { index: 4, start: 90.0, length: chunk };

    assert_eq!(full.effective_length(total), 30.0);
    assert_eq!(last.effective_length(total), 5.0);
}

#[test]
fn test_segment_job_trim_request() {
    let job = SegmentJob {
        segment: Segment {
            index: 2,
            start: 30.0,
            length: ChunkSize::new(30.0).unwrap(),
        },
        source_path: PathBuf::from("movie.mp4"),
        destination_path: PathBuf::from("out/movie_2.mp4"),
    };

    let request = job.trim_request();
    assert_eq!(job.index(), 2);
    assert_eq!(request.start, 30.0);
    assert_eq!(request.duration, 30.0);
    assert_eq!(request.source, PathBuf::from("movie.mp4"));
    assert_eq!(request.destination, PathBuf::from("out/movie_2.mp4"));
}

#[test]
fn test_failure_policy_default_collects_all() {
    assert_eq!(FailurePolicy::default(), FailurePolicy::CollectAll);
}

#[test]
fn test_segment_failure_display() {
    let failure = SegmentFailure {
        index: 3,
        message: "Conversion failed!".to_string(),
    };
    assert_eq!(failure.to_string(), "segment 3: Conversion failed!");
}

#[test]
fn test_run_phase_display() {
    assert_eq!(RunPhase::Partitioning.to_string(), "partitioning");
    assert_eq!(RunPhase::Aborted.to_string(), "aborted");
}

#[test]
fn test_extension_of() {
    assert_eq!(extension_of(Path::new("a/b/Clip.MKV")), Some("mkv".to_string()));
    assert_eq!(extension_of(Path::new("noext")), None);
}
