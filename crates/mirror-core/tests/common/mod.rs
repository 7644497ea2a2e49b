//! Shared fixtures: a small geometry model

#![allow(dead_code)]

use mirror_core::{enum_type, user_type, ReflectResult, Registry, RegistryOptions};

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn quadrant(&self) -> Quadrant {
        match (self.x >= 0.0, self.y >= 0.0) {
            (true, true) => Quadrant::First,
            (false, true) => Quadrant::Second,
            (false, false) => Quadrant::Third,
            (true, false) => Quadrant::Fourth,
        }
    }
}

/// A point with a label, reflected as a class derived from `Point`
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub point: Point,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quadrant {
    First = 1,
    Second = 2,
    Third = 3,
    Fourth = 4,
}

user_type!(Point, Marker);
enum_type!(Quadrant { First, Second, Third, Fourth });

pub fn registry() -> Registry {
    build(Registry::new()).expect("fixture registration")
}

pub fn flat_registry() -> Registry {
    build(Registry::with_options(RegistryOptions::flat())).expect("fixture registration")
}

fn build(mut registry: Registry) -> ReflectResult<Registry> {
    registry
        .declare_enum::<Quadrant>("Quadrant")
        .value("First", Quadrant::First)
        .value("Second", Quadrant::Second)
        .value("Third", Quadrant::Third)
        .value("Fourth", Quadrant::Fourth)
        .register()?;

    registry
        .declare_class::<Point>("Point")
        .constructor(|| Point::new(0.0, 0.0))
        .constructor(Point::new)
        .property_rw("x", |p: &Point| p.x, |p: &mut Point, x| p.x = x)
        .property_rw("y", |p: &Point| p.y, |p: &mut Point, y| p.y = y)
        .property("quadrant", Point::quadrant)
        .function("length", |p: &Point| p.length())
        .function("translate", |p: &mut Point, dx: f64, dy: f64| {
            p.x += dx;
            p.y += dy;
        })
        .function("scale", |p: &mut Point, factor: f64| {
            p.x *= factor;
            p.y *= factor;
            "real"
        })
        .function("scale", |p: &mut Point, factor: i64| {
            p.x *= factor as f64;
            p.y *= factor as f64;
            "integer"
        })
        .function("moved", |p: &Point, dx: f64, dy: f64| Point::new(p.x + dx, p.y + dy))
        .function("distance", |p: &Point, other: Point| {
            Point::new(p.x - other.x, p.y - other.y).length()
        })
        .register()?;

    registry
        .declare_class::<Marker>("Marker")
        .base::<Point>(|m| &m.point, |m| &mut m.point)
        .constructor(|label: String, x: f64, y: f64| Marker {
            point: Point::new(x, y),
            label,
        })
        .property_rw(
            "label",
            |m: &Marker| m.label.clone(),
            |m: &mut Marker, label: String| m.label = label,
        )
        .function("describe", |m: &Marker| format!("{} at ({}, {})", m.label, m.point.x, m.point.y))
        .register()?;

    Ok(registry)
}
