//! Prop lists shared by struct and interface.

use crate::{
    String, Vec,
    api::Error,
    format,
    types::{Prop, Type},
};

/// Adds `(name, ty)` to `props`, rejecting a conflicting redefinition.
///
/// Redefining a prop with the identical type is a no-op.
pub(crate) fn add_prop<'a>(
    props: &mut Vec<Prop<'a>>,
    combinator: &'static str,
    name: &'a str,
    ty: Type<'a>,
) -> Result<(), Error> {
    match props.iter().find(|(existing, _)| *existing == name) {
        Some(&(_, existing)) if existing == ty => Ok(()),
        Some(_) => Err(Error::combinator(
            combinator,
            format!("cannot overwrite property \"{}\"", name),
        )),
        None => {
            props.push((name, ty));
            Ok(())
        }
    }
}

/// Props contributed by a mixin, which must be a struct or an interface.
pub(crate) fn mixin_props<'a>(
    combinator: &'static str,
    mixin: Type<'a>,
) -> Result<&'a [Prop<'a>], Error> {
    mixin.meta().props().ok_or_else(|| {
        Error::combinator(
            combinator,
            format!(
                "mixin {} must be a struct or an interface, got {}",
                mixin.name(),
                mixin.kind()
            ),
        )
    })
}

/// `{x: Number, y: Number}`.
pub(crate) fn describe_props(props: &[Prop<'_>]) -> String {
    let mut out = String::from("{");
    for (i, (name, ty)) in props.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(ty.name());
    }
    out.push('}');
    out
}
