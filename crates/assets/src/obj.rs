//! Wavefront `.obj` parsing.
//!
//! Indices in an `.obj` file are global to the file and 1-based (negative
//! values count back from the most recent declaration). The parser resolves
//! them and re-bases every face onto its own model's vertex list, so an
//! [`ObjModel`] is self-contained.

use crate::AssetError;
use glam::Vec3;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;
use thingview_kernel::Thing;

/// One corner of a face, zero-based into the owning model's lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjFaceVertex {
    pub vertex_index: usize,
    pub texture_coords_index: Option<usize>,
    pub vertex_normal_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjFace {
    pub group: String,
    pub material: String,
    pub smoothing_group: u32,
    pub vertices: Vec<ObjFaceVertex>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjModel {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub texture_coords: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
    pub faces: Vec<ObjFace>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjFile {
    pub material_libraries: Vec<String>,
    pub models: Vec<ObjModel>,
}

const DEFAULT_MODEL: &str = "default";

/// Re-bases global indices of one attribute kind onto a model-local list.
#[derive(Default)]
struct Remap(HashMap<usize, usize>);

impl Remap {
    fn local(&mut self, global: usize, source: &[Vec3], target: &mut Vec<Vec3>) -> usize {
        *self.0.entry(global).or_insert_with(|| {
            target.push(source[global]);
            target.len() - 1
        })
    }
}

struct ModelState {
    model: ObjModel,
    first_vertex: usize,
    vertices: Remap,
    texture_coords: Remap,
    normals: Remap,
}

impl ModelState {
    fn new(name: String, first_vertex: usize) -> Self {
        Self {
            model: ObjModel {
                name,
                ..ObjModel::default()
            },
            first_vertex,
            vertices: Remap::default(),
            texture_coords: Remap::default(),
            normals: Remap::default(),
        }
    }

    /// Close the model at vertex count `end`.
    fn close(self, end: usize) -> Closed {
        if self.model.faces.is_empty() {
            Closed::Points {
                name: self.model.name,
                vertices: self.first_vertex..end,
            }
        } else {
            Closed::Model(self.model)
        }
    }
}

/// A finished model. Face-less models are resolved once the whole file is
/// read, since later faces may still use their vertices.
enum Closed {
    Model(ObjModel),
    Points { name: String, vertices: Range<usize> },
}

#[derive(Default)]
struct Parser {
    positions: Vec<Vec3>,
    texture_coords: Vec<Vec3>,
    normals: Vec<Vec3>,
    material_libraries: Vec<String>,
    closed: Vec<Closed>,
    current: Option<ModelState>,
    /// Global vertex indices used by any face.
    referenced: HashSet<usize>,
    group: String,
    material: String,
    smoothing_group: u32,
}

fn parse_error(line: usize, message: impl Into<String>) -> AssetError {
    AssetError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_floats(
    line: usize,
    keyword: &str,
    args: &[&str],
    min: usize,
    max: usize,
) -> Result<Vec<f32>, AssetError> {
    if args.len() < min {
        return Err(parse_error(
            line,
            format!("'{keyword}' needs at least {min} components, got {}", args.len()),
        ));
    }
    args.iter()
        .take(max)
        .map(|a| {
            a.parse::<f32>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| parse_error(line, format!("invalid number '{a}' in '{keyword}'")))
        })
        .collect()
}

/// Resolve a 1-based or negative relative index against `len` declarations.
fn resolve_index(line: usize, raw: &str, len: usize) -> Result<usize, AssetError> {
    let index: i64 = raw
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{raw}'")))?;
    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(len as i64 + i),
    };
    match resolved {
        Some(r) if r >= 0 && (r as usize) < len => Ok(r as usize),
        _ => Err(AssetError::IndexOutOfRange { line, index, len }),
    }
}

impl Parser {
    fn current(&mut self) -> &mut ModelState {
        let first_vertex = self.positions.len();
        self.current
            .get_or_insert_with(|| ModelState::new(DEFAULT_MODEL.to_string(), first_vertex))
    }

    fn start_model(&mut self, name: String) {
        if let Some(done) = self.current.take() {
            self.closed.push(done.close(self.positions.len()));
        }
        self.current = Some(ModelState::new(name, self.positions.len()));
    }

    fn statement(&mut self, line: usize, keyword: &str, args: &[&str]) -> Result<(), AssetError> {
        match keyword {
            "v" => {
                let c = parse_floats(line, keyword, args, 3, 3)?;
                self.current();
                self.positions.push(Vec3::new(c[0], c[1], c[2]));
            }
            "vt" => {
                let c = parse_floats(line, keyword, args, 1, 3)?;
                let get = |i: usize| c.get(i).copied().unwrap_or(0.0);
                self.texture_coords.push(Vec3::new(get(0), get(1), get(2)));
            }
            "vn" => {
                let c = parse_floats(line, keyword, args, 3, 3)?;
                self.normals.push(Vec3::new(c[0], c[1], c[2]));
            }
            "f" => self.face(line, args)?,
            "o" => self.start_model(args.join(" ")),
            "g" => {
                self.group = if args.is_empty() {
                    DEFAULT_MODEL.to_string()
                } else {
                    args.join(" ")
                };
            }
            "usemtl" => self.material = args.join(" "),
            "mtllib" => self
                .material_libraries
                .extend(args.iter().map(|s| s.to_string())),
            "s" => {
                self.smoothing_group = match args.first().copied() {
                    None | Some("off") => 0,
                    Some(raw) => raw
                        .parse()
                        .map_err(|_| parse_error(line, format!("invalid smoothing group '{raw}'")))?,
                };
            }
            other => tracing::trace!(line, keyword = other, "skipping obj statement"),
        }
        Ok(())
    }

    fn face(&mut self, line: usize, args: &[&str]) -> Result<(), AssetError> {
        if args.len() < 3 {
            return Err(parse_error(
                line,
                format!("face needs at least 3 vertices, got {}", args.len()),
            ));
        }
        let mut corners = Vec::with_capacity(args.len());
        for arg in args {
            let mut parts = arg.split('/');
            let v = parts.next().unwrap_or_default();
            let vt = parts.next().filter(|s| !s.is_empty());
            let vn = parts.next().filter(|s| !s.is_empty());
            if parts.next().is_some() {
                return Err(parse_error(line, format!("malformed face vertex '{arg}'")));
            }
            let v = resolve_index(line, v, self.positions.len())?;
            let vt = vt
                .map(|raw| resolve_index(line, raw, self.texture_coords.len()))
                .transpose()?;
            let vn = vn
                .map(|raw| resolve_index(line, raw, self.normals.len()))
                .transpose()?;
            corners.push((v, vt, vn));
        }
        self.referenced.extend(corners.iter().map(|(v, _, _)| *v));

        let (group, material, smoothing_group) =
            (self.group.clone(), self.material.clone(), self.smoothing_group);
        let Self {
            positions,
            texture_coords,
            normals,
            current,
            ..
        } = self;
        let (positions, texture_coords, normals) =
            (positions.as_slice(), texture_coords.as_slice(), normals.as_slice());
        let first_vertex = positions.len();
        let state = current
            .get_or_insert_with(|| ModelState::new(DEFAULT_MODEL.to_string(), first_vertex));
        let model = &mut state.model;
        let vertices = corners
            .into_iter()
            .map(|(v, vt, vn)| ObjFaceVertex {
                vertex_index: state.vertices.local(v, positions, &mut model.vertices),
                texture_coords_index: vt
                    .map(|t| state.texture_coords.local(t, texture_coords, &mut model.texture_coords)),
                vertex_normal_index: vn
                    .map(|n| state.normals.local(n, normals, &mut model.vertex_normals)),
            })
            .collect();
        model.faces.push(ObjFace {
            group,
            material,
            smoothing_group,
            vertices,
        });
        Ok(())
    }

    /// A face-less model keeps, as a point set, the vertices declared while
    /// it was current that no face uses. If every one is used elsewhere the
    /// model is dropped.
    fn finish(mut self) -> ObjFile {
        if let Some(done) = self.current.take() {
            self.closed.push(done.close(self.positions.len()));
        }
        let Self {
            positions,
            referenced,
            closed,
            material_libraries,
            ..
        } = self;
        let models = closed
            .into_iter()
            .filter_map(|model| match model {
                Closed::Model(model) => Some(model),
                Closed::Points { name, vertices } => {
                    let points: Vec<Vec3> = vertices
                        .filter(|i| !referenced.contains(i))
                        .map(|i| positions[i])
                        .collect();
                    if points.is_empty() {
                        return None;
                    }
                    tracing::warn!(model = %name, "obj model has vertices but no faces");
                    Some(ObjModel {
                        name,
                        vertices: points,
                        ..ObjModel::default()
                    })
                }
            })
            .collect();
        ObjFile {
            material_libraries,
            models,
        }
    }
}

impl ObjFile {
    /// Parse `.obj` source text.
    pub fn parse(source: &str) -> Result<Self, AssetError> {
        let mut parser = Parser {
            group: DEFAULT_MODEL.to_string(),
            ..Parser::default()
        };
        for (n, raw) in source.lines().enumerate() {
            let content = raw.split('#').next().unwrap_or_default();
            let mut tokens = content.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };
            let args: Vec<&str> = tokens.collect();
            parser.statement(n + 1, keyword, &args)?;
        }
        let file = parser.finish();
        tracing::debug!(
            models = file.models.len(),
            faces = file.models.iter().map(|m| m.faces.len()).sum::<usize>(),
            "parsed obj"
        );
        Ok(file)
    }

    /// Read and parse an `.obj` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&source)
    }

    /// One Thing per model.
    pub fn to_things(&self) -> Result<Vec<Thing>, AssetError> {
        self.models.iter().map(ObjModel::to_thing).collect()
    }

    /// All models merged into a single Thing.
    pub fn merged_thing(&self, name: impl Into<String>) -> Result<Thing, AssetError> {
        if self.models.is_empty() {
            return Err(AssetError::NoGeometry);
        }
        let mut thing = Thing::new(name);
        for model in &self.models {
            let offset = thing.vertices().len();
            thing.add_vertices(model.vertices.iter().copied());
            for face in &model.faces {
                thing.add_face(face.vertices.iter().map(|c| c.vertex_index + offset))?;
            }
        }
        Ok(thing)
    }
}

impl ObjModel {
    /// Convert to a kernel Thing named after the model.
    pub fn to_thing(&self) -> Result<Thing, AssetError> {
        let mut thing = Thing::new(self.name.clone());
        thing.add_vertices(self.vertices.iter().copied());
        for face in &self.faces {
            thing.add_face(face.vertices.iter().map(|c| c.vertex_index))?;
        }
        Ok(thing)
    }
}
