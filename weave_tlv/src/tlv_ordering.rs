//! Canonical ordering of container members.
//!
//! - Anonymous tags come first
//! - Context tags come next, smaller tag ids first
//! - Profile tags are last, ordered by (vendor id, profile id, tag id)
//!
//! Implicit tags have no place in this order. The decoder resolves them
//! before sorting, so meeting one here means the caller built the elements
//! by hand.

use std::cmp::Ordering;

use crate::{
    error::Error,
    tlv_types::{Element, Tag},
};

fn rank(tag: &Tag) -> Result<u8, Error> {
    match tag {
        Tag::Anonymous => Ok(0),
        Tag::Context(_) => Ok(1),
        Tag::Profile(_, _) => Ok(2),
        Tag::Implicit(_) => Err(Error::UnresolvableTagOrdering { tag: *tag }),
    }
}

pub fn compare_tags(x: &Tag, y: &Tag) -> Result<Ordering, Error> {
    let (rx, ry) = (rank(x)?, rank(y)?);
    if rx != ry {
        return Ok(rx.cmp(&ry));
    }
    Ok(match (x, y) {
        (Tag::Context(a), Tag::Context(b)) => a.cmp(b),
        (Tag::Profile(pa, a), Tag::Profile(pb, b)) => pa
            .vendor_id
            .cmp(&pb.vendor_id)
            .then(pa.profile_id.cmp(&pb.profile_id))
            .then(a.cmp(b)),
        // Both anonymous
        _ => Ordering::Equal,
    })
}

pub fn compare(x: &Element, y: &Element) -> Result<Ordering, Error> {
    compare_tags(&x.tag, &y.tag)
}

/// Stable sort of `elements` into canonical order. Fails, leaving the slice
/// untouched, if any member carries an implicit tag.
pub fn sort_canonical(elements: &mut [Element]) -> Result<(), Error> {
    for e in elements.iter() {
        rank(&e.tag)?;
    }
    // Every tag is ranked, so the comparison can no longer fail
    elements.sort_by(|x, y| compare(x, y).unwrap_or(Ordering::Equal));
    Ok(())
}
