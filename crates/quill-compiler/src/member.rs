//! Field and property access.

use quill_core::{Expr, MemberEntry, TypeSystem};

/// Bind a member access to the first candidate that accepts it.
///
/// A candidate accepts a plain read (no arguments). With arguments, only an
/// indexer property that is its declaring type's default member accepts.
/// Static members drop the receiver.
pub fn dispatch_member<T: TypeSystem + ?Sized>(
    types: &T,
    receiver: Option<Expr>,
    members: &[MemberEntry],
    args: Vec<Expr>,
) -> Option<Expr> {
    let member = members.iter().find(|m| {
        args.is_empty()
            || (m.is_indexer() && types.default_member(m.owner()).as_deref() == Some(m.name()))
    })?;

    let receiver = if member.is_static() { None } else { receiver };
    Some(Expr::Member {
        receiver: receiver.map(Box::new),
        ty: member.data_type(),
        member: member.clone(),
        args,
    })
}
