//! Chronological ordering of raw events

use super::error::Result;
use super::normalizer::RawEvent;

/// Order events oldest first. Events sharing a timestamp keep their input
/// order. Fails on the first record whose timestamp is absent or unparsable.
pub fn sort_events(events: Vec<RawEvent>) -> Result<Vec<RawEvent>> {
    let mut keyed = events
        .into_iter()
        .map(|event| -> Result<_> { Ok((event.timestamp()?, event)) })
        .collect::<Result<Vec<_>>>()?;

    // slice::sort_by_key is stable
    keyed.sort_by_key(|(timestamp, _)| *timestamp);

    Ok(keyed.into_iter().map(|(_, event)| event).collect())
}
