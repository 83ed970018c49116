//! Tests for `LimitedBody`.

use super::HttpError;
use super::body::LimitedBody;

#[test]
fn announced_length_over_limit_is_rejected_up_front() {
    let result = LimitedBody::start(Some(10), Some(1 << 30));

    assert!(matches!(
        result,
        Err(HttpError::BodyTooLarge { size: 1_073_741_824, limit: 10 })
    ));
}

#[test]
fn chunks_past_limit_are_rejected() {
    let mut body = LimitedBody::start(Some(10), None).unwrap();

    body.push(b"123456").unwrap();
    let err = body.push(b"12345").unwrap_err();

    assert!(matches!(err, HttpError::BodyTooLarge { size: 11, limit: 10 }));
}

#[test]
fn understated_length_is_still_enforced() {
    let mut body = LimitedBody::start(Some(4), Some(2)).unwrap();

    assert!(body.push(b"12345").is_err());
}

#[test]
fn body_at_limit_is_kept() {
    let mut body = LimitedBody::start(Some(6), Some(6)).unwrap();

    body.push(b"abc").unwrap();
    body.push(b"def").unwrap();

    assert_eq!(body.finish(), b"abcdef");
}

#[test]
fn no_limit_accepts_anything() {
    let mut body = LimitedBody::start(None, Some(u64::MAX)).unwrap();

    body.push(&[0; 4096]).unwrap();

    assert_eq!(body.finish().len(), 4096);
}
