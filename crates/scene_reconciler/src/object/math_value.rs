//! Settable math values and their capability sets
//!
//! A scene object's transform, colour and layer properties are not plain
//! scalars: they are mutated in place through `set`, `copy` and `set_scalar`
//! operations. [`MathValue`] is the tagged variant over those types and
//! [`Capabilities`] tells the property applier which operations apply.

use std::mem;

use bitflags::bitflags;

use crate::error::{ReconcileError, Result};
use crate::foundation::math::{Color, Euler, EulerOrder, Quat, Vec2, Vec3, Vec4};

use super::value::Value;

bitflags! {
    /// Operations a settable value supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Mutate in place from positional arguments
        const SET = 1;
        /// Copy the state of another value of the same type
        const COPY = 1 << 1;
        /// Write one scalar to every component
        const SET_SCALAR = 1 << 2;
    }
}

/// A math value held by a scene object property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathValue {
    /// Two-component vector
    Vector2(Vec2),
    /// Three-component vector
    Vector3(Vec3),
    /// Four-component vector
    Vector4(Vec4),
    /// Euler rotation
    Euler(Euler),
    /// Rotation quaternion
    Quaternion(Quat),
    /// RGB colour
    Color(Color),
    /// Visibility layer bitmask
    Layers(u32),
}

impl MathValue {
    /// Name of the underlying type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Vector2(_) => "Vector2",
            Self::Vector3(_) => "Vector3",
            Self::Vector4(_) => "Vector4",
            Self::Euler(_) => "Euler",
            Self::Quaternion(_) => "Quaternion",
            Self::Color(_) => "Color",
            Self::Layers(_) => "Layers",
        }
    }

    /// The operations this value supports
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Vector2(_) | Self::Vector3(_) | Self::Vector4(_) | Self::Color(_) => {
                Capabilities::all()
            }
            Self::Euler(_) | Self::Quaternion(_) => Capabilities::SET | Capabilities::COPY,
            Self::Layers(_) => Capabilities::SET,
        }
    }

    /// Whether this is a colour (a bare scalar means a colour code, not a channel value)
    pub fn is_color(&self) -> bool {
        matches!(self, Self::Color(_))
    }

    /// Whether `other` is the exact same type as `self`
    pub fn same_type(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// Copy the state of `other` into `self`
    pub fn copy_from(&mut self, other: &Self) -> Result<()> {
        if !self.capabilities().contains(Capabilities::COPY) || !self.same_type(other) {
            return Err(ReconcileError::invalid_value(
                self.type_name(),
                format!("cannot copy from {}", other.type_name()),
            ));
        }
        *self = *other;
        Ok(())
    }

    /// Write `scalar` to every component
    pub fn set_scalar(&mut self, scalar: f32) -> Result<()> {
        match self {
            Self::Vector2(v) => v.fill(scalar),
            Self::Vector3(v) => v.fill(scalar),
            Self::Vector4(v) => v.fill(scalar),
            Self::Color(c) => *c = Color::rgb(scalar, scalar, scalar),
            _ => {
                return Err(ReconcileError::invalid_value(
                    self.type_name(),
                    "scalar assignment is not supported",
                ))
            }
        }
        Ok(())
    }

    /// Mutate in place from positional arguments
    pub fn set(&mut self, args: &[Value]) -> Result<()> {
        let name = self.type_name();
        match self {
            Self::Vector2(v) => {
                let [x, y] = numbers::<2>(name, args)?;
                *v = Vec2::new(x, y);
            }
            Self::Vector3(v) => {
                let [x, y, z] = numbers::<3>(name, args)?;
                *v = Vec3::new(x, y, z);
            }
            Self::Vector4(v) => {
                let [x, y, z, w] = numbers::<4>(name, args)?;
                *v = Vec4::new(x, y, z, w);
            }
            Self::Quaternion(q) => {
                let [x, y, z, w] = numbers::<4>(name, args)?;
                *q = Quat::new(w, x, y, z);
            }
            Self::Euler(e) => {
                let (angles, order) = match args {
                    [rest @ .., Value::Text(code)] => (rest, Some(parse_order(code)?)),
                    _ => (args, None),
                };
                let [x, y, z] = numbers::<3>(name, angles)?;
                *e = Euler::new(x, y, z).with_order(order.unwrap_or(e.order));
            }
            Self::Color(c) => *c = color_from_args(args)?,
            Self::Layers(mask) => {
                let [channel] = numbers::<1>(name, args)?;
                *mask = 1u32
                    .checked_shl(channel as u32)
                    .filter(|_| channel >= 0.0)
                    .ok_or_else(|| {
                        let reason = format!("channel {channel} out of range");
                        ReconcileError::invalid_value(name, reason)
                    })?;
            }
        }
        Ok(())
    }

    /// Read a named component (`x`, `r`, `order`, `mask`, ...)
    pub fn field(&self, name: &str) -> Option<Value> {
        let number = |n: f32| Some(Value::Number(f64::from(n)));
        match (self, name) {
            (Self::Vector2(v), "x") => number(v.x),
            (Self::Vector2(v), "y") => number(v.y),
            (Self::Vector3(v), "x") => number(v.x),
            (Self::Vector3(v), "y") => number(v.y),
            (Self::Vector3(v), "z") => number(v.z),
            (Self::Vector4(v), "x") => number(v.x),
            (Self::Vector4(v), "y") => number(v.y),
            (Self::Vector4(v), "z") => number(v.z),
            (Self::Vector4(v), "w") => number(v.w),
            (Self::Quaternion(q), "x") => number(q.coords[0]),
            (Self::Quaternion(q), "y") => number(q.coords[1]),
            (Self::Quaternion(q), "z") => number(q.coords[2]),
            (Self::Quaternion(q), "w") => number(q.coords[3]),
            (Self::Euler(e), "x") => number(e.x),
            (Self::Euler(e), "y") => number(e.y),
            (Self::Euler(e), "z") => number(e.z),
            (Self::Euler(e), "order") => Some(Value::Text(e.order.code().to_owned())),
            (Self::Color(c), "r") => number(c.r),
            (Self::Color(c), "g") => number(c.g),
            (Self::Color(c), "b") => number(c.b),
            (Self::Layers(mask), "mask") => Some(Value::Number(f64::from(*mask))),
            _ => None,
        }
    }

    /// Assign a named component
    pub fn set_field(&mut self, name: &str, value: &Value) -> Result<()> {
        let type_name = self.type_name();
        if let (Self::Euler(e), "order") = (&mut *self, name) {
            let code = value.as_text().ok_or_else(|| {
                ReconcileError::invalid_value("Euler.order", "expected an order code")
            })?;
            e.order = parse_order(code)?;
            return Ok(());
        }
        let n = value.as_number().ok_or_else(|| {
            ReconcileError::invalid_value(format!("{type_name}.{name}"), "expected a number")
        })? as f32;
        let slot: &mut f32 = match (self, name) {
            (Self::Vector2(v), "x") => &mut v.x,
            (Self::Vector2(v), "y") => &mut v.y,
            (Self::Vector3(v), "x") => &mut v.x,
            (Self::Vector3(v), "y") => &mut v.y,
            (Self::Vector3(v), "z") => &mut v.z,
            (Self::Vector4(v), "x") => &mut v.x,
            (Self::Vector4(v), "y") => &mut v.y,
            (Self::Vector4(v), "z") => &mut v.z,
            (Self::Vector4(v), "w") => &mut v.w,
            (Self::Quaternion(q), "x") => &mut q.coords[0],
            (Self::Quaternion(q), "y") => &mut q.coords[1],
            (Self::Quaternion(q), "z") => &mut q.coords[2],
            (Self::Quaternion(q), "w") => &mut q.coords[3],
            (Self::Euler(e), "x") => &mut e.x,
            (Self::Euler(e), "y") => &mut e.y,
            (Self::Euler(e), "z") => &mut e.z,
            (Self::Color(c), "r") => &mut c.r,
            (Self::Color(c), "g") => &mut c.g,
            (Self::Color(c), "b") => &mut c.b,
            (Self::Layers(mask), "mask") => {
                *mask = n as u32;
                return Ok(());
            }
            _ => {
                return Err(ReconcileError::invalid_value(
                    type_name,
                    format!("no component named `{name}`"),
                ))
            }
        };
        *slot = n;
        Ok(())
    }
}

fn numbers<const N: usize>(target: &str, args: &[Value]) -> Result<[f32; N]> {
    if args.len() != N {
        return Err(ReconcileError::invalid_value(
            target,
            format!("expected {N} components, got {}", args.len()),
        ));
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.as_number().ok_or_else(|| {
            let reason = format!("expected a number, got {}", arg.type_name());
            ReconcileError::invalid_value(target, reason)
        })? as f32;
    }
    Ok(out)
}

fn parse_order(code: &str) -> Result<EulerOrder> {
    EulerOrder::parse(code)
        .ok_or_else(|| ReconcileError::invalid_value("Euler", format!("unknown order `{code}`")))
}

fn color_from_args(args: &[Value]) -> Result<Color> {
    match args {
        [Value::Number(hex)] if *hex >= 0.0 && *hex <= f64::from(0x00ff_ffff_u32) => {
            Ok(Color::from_hex(*hex as u32))
        }
        [Value::Text(style)] => Color::parse(style).ok_or_else(|| {
            ReconcileError::invalid_value("Color", format!("unknown colour `{style}`"))
        }),
        [Value::Math(other)] => match other.try_get() {
            Some(MathValue::Color(c)) => Ok(c),
            Some(other) => Err(ReconcileError::invalid_value(
                "Color",
                format!("cannot set from {}", other.type_name()),
            )),
            None => Err(ReconcileError::invalid_value("Color", "cannot set a colour from itself")),
        },
        [_, _, _] => {
            let [r, g, b] = numbers::<3>("Color", args)?;
            Ok(Color::rgb(r, g, b))
        }
        _ => Err(ReconcileError::invalid_value(
            "Color",
            "expected a hex code, a colour string, a Color, or r, g, b",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_capabilities_per_type() {
        let vector = MathValue::Vector3(Vec3::zeros());
        assert_eq!(vector.capabilities(), Capabilities::all());

        let euler = MathValue::Euler(Euler::default());
        assert!(euler.capabilities().contains(Capabilities::COPY));
        assert!(!euler.capabilities().contains(Capabilities::SET_SCALAR));

        let layers = MathValue::Layers(1);
        assert_eq!(layers.capabilities(), Capabilities::SET);
    }

    #[test]
    fn test_set_scalar_fills_components() {
        let mut scale = MathValue::Vector3(Vec3::new(1.0, 2.0, 3.0));
        scale.set_scalar(0.5).unwrap();
        assert_eq!(scale, MathValue::Vector3(Vec3::new(0.5, 0.5, 0.5)));

        let mut euler = MathValue::Euler(Euler::default());
        assert!(euler.set_scalar(1.0).is_err());
    }

    #[test]
    fn test_set_checks_arity() {
        let mut position = MathValue::Vector3(Vec3::zeros());
        position
            .set(&[Value::from(1.0), Value::from(2.0), Value::from(3.0)])
            .unwrap();
        assert_eq!(position, MathValue::Vector3(Vec3::new(1.0, 2.0, 3.0)));

        let err = position.set(&[Value::from(1.0), Value::from(2.0)]).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidValue { .. }));
    }

    #[test]
    fn test_euler_set_with_order() {
        let mut rotation = MathValue::Euler(Euler::default());
        rotation
            .set(&[Value::from(0.1), Value::from(0.2), Value::from(0.3), Value::from("ZYX")])
            .unwrap();
        let MathValue::Euler(e) = rotation else { panic!("type changed") };
        assert_relative_eq!(e.y, 0.2);
        assert_eq!(e.order, EulerOrder::Zyx);
    }

    #[test]
    fn test_color_set_forms() {
        let mut color = MathValue::Color(Color::WHITE);
        color.set(&[Value::from(0x00ff00)]).unwrap();
        assert_eq!(color, MathValue::Color(Color::rgb(0.0, 1.0, 0.0)));

        color.set(&[Value::from("red")]).unwrap();
        assert_eq!(color, MathValue::Color(Color::rgb(1.0, 0.0, 0.0)));

        color
            .set(&[Value::from(0.25), Value::from(0.5), Value::from(0.75)])
            .unwrap();
        assert_eq!(color, MathValue::Color(Color::rgb(0.25, 0.5, 0.75)));
    }

    #[test]
    fn test_layers_set_channel() {
        let mut layers = MathValue::Layers(1);
        layers.set(&[Value::from(3)]).unwrap();
        assert_eq!(layers, MathValue::Layers(0b1000));
        assert!(layers.set(&[Value::from(40)]).is_err());
    }

    #[test]
    fn test_copy_requires_same_type() {
        let mut target = MathValue::Vector2(Vec2::zeros());
        target.copy_from(&MathValue::Vector2(Vec2::new(4.0, 5.0))).unwrap();
        assert_eq!(target, MathValue::Vector2(Vec2::new(4.0, 5.0)));
        assert!(target.copy_from(&MathValue::Vector3(Vec3::zeros())).is_err());
    }

    #[test]
    fn test_component_access() {
        let mut position = MathValue::Vector3(Vec3::zeros());
        position.set_field("y", &Value::from(7.0)).unwrap();
        assert_eq!(position.field("y"), Some(Value::Number(7.0)));
        assert!(position.set_field("w", &Value::from(1.0)).is_err());

        let mut rotation = MathValue::Euler(Euler::default());
        rotation.set_field("order", &Value::from("YXZ")).unwrap();
        assert_eq!(rotation.field("order"), Some(Value::from("YXZ")));
    }
}
