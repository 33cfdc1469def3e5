//! Clip-path renderer: every visible face becomes an absolutely positioned
//! element clipped to its projected outline and stacked by `z-index`.
//!
//! The renderer is retained: it remembers the styles it emitted last frame
//! and reports only what changed as [`DomPatch`]es, so a host page can update
//! existing nodes instead of rebuilding the container every frame.

use crate::RenderError;
use crate::camera::{Camera, Viewport};
use crate::painter::{ProjectedFace, project_world};
use crate::renderer::Renderer;
use std::collections::BTreeMap;
use thingview_common::ThingId;
use thingview_kernel::World;

/// Stylesheet tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct DomRendererConfig {
    /// CSS transition duration in milliseconds.
    pub speed_ms: u32,
    /// CSS transition timing function.
    pub transition: String,
}

impl Default for DomRendererConfig {
    fn default() -> Self {
        Self {
            speed_ms: 500,
            transition: "linear".into(),
        }
    }
}

/// Inline style of one face element.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceStyle {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    /// `polygon(...)` relative to the element's box.
    pub clip_path: String,
    pub z_index: usize,
    pub fill: String,
}

impl FaceStyle {
    fn from_face(face: &ProjectedFace, z_index: usize) -> Option<Self> {
        let bounds = face.polygon.bounds()?;
        let left = bounds.left.floor();
        let top = bounds.top.floor();
        let right = bounds.right.ceil();
        let bottom = bounds.bottom.ceil();

        let mut clip_path = String::from("polygon(");
        for (i, p) in face.polygon.points.iter().enumerate() {
            if i > 0 {
                clip_path.push_str(", ");
            }
            clip_path.push_str(&format!("{:.2}px {:.2}px", p.x - left, p.y - top));
        }
        clip_path.push(')');

        Some(Self {
            left: left as i32,
            top: top as i32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
            clip_path,
            z_index,
            fill: format!("hsl({}, 60%, 55%)", (face.face * 47) % 360),
        })
    }

    /// Inline CSS declaration block.
    pub fn css(&self) -> String {
        format!(
            "left: {}px; top: {}px; width: {}px; height: {}px; clip-path: {}; z-index: {}; background: {};",
            self.left, self.top, self.width, self.height, self.clip_path, self.z_index, self.fill
        )
    }
}

/// One positioned face element.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceElement {
    /// Stable DOM key, `thing-<uuid>-face-<n>`.
    pub key: String,
    pub thing: ThingId,
    pub face: usize,
    pub style: FaceStyle,
}

/// Change to apply to the host's element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DomPatch {
    Create(FaceElement),
    Update(FaceElement),
    Remove { key: String },
}

/// Output of one DOM frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DomFrame {
    pub viewport: Viewport,
    /// All visible elements in painter's order.
    pub elements: Vec<FaceElement>,
    /// Changes relative to the previous frame of the same renderer.
    pub patches: Vec<DomPatch>,
    pub stylesheet: String,
}

impl DomFrame {
    /// Standalone HTML document containing the frame.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n<title>thingview</title>\n");
        html.push_str(&format!(
            "<style>#game-window {{ position: relative; width: {}px; height: {}px; overflow: hidden; }}\n{}</style>\n",
            self.viewport.width, self.viewport.height, self.stylesheet
        ));
        html.push_str("</head>\n<body>\n");
        html.push_str("<div id=\"game-window\"><div class=\"world\">\n");
        for el in &self.elements {
            html.push_str(&format!(
                "<div class=\"face\" data-key=\"{}\" style=\"{}\"></div>\n",
                el.key,
                el.style.css()
            ));
        }
        html.push_str("</div></div>\n</body>\n</html>\n");
        html
    }
}

/// Retained clip-path renderer.
#[derive(Debug, Default)]
pub struct DomRenderer {
    viewport: Viewport,
    config: DomRendererConfig,
    nodes: BTreeMap<String, FaceStyle>,
}

impl DomRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(viewport, DomRendererConfig::default())
    }

    pub fn with_config(viewport: Viewport, config: DomRendererConfig) -> Self {
        Self {
            viewport,
            config,
            nodes: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &DomRendererConfig {
        &self.config
    }

    /// Change transition settings; affects the stylesheet of later frames.
    pub fn set_config(&mut self, config: DomRendererConfig) {
        self.config = config;
    }

    /// Forget retained elements; the next frame creates everything afresh.
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    /// Number of elements currently retained.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn stylesheet(&self) -> String {
        format!(
            ".face {{ position: absolute; transition: all {}ms {}; }}",
            self.config.speed_ms, self.config.transition
        )
    }
}

fn face_key(thing: ThingId, face: usize) -> String {
    format!("thing-{}-face-{face}", thing.0.simple())
}

impl Renderer for DomRenderer {
    type Output = DomFrame;

    fn render(&mut self, world: &World, camera: &Camera) -> Result<DomFrame, RenderError> {
        let frame = project_world(world, camera, self.viewport)?;
        let elements: Vec<FaceElement> = frame
            .faces
            .iter()
            .enumerate()
            .filter_map(|(rank, face)| {
                FaceStyle::from_face(face, rank + 1).map(|style| FaceElement {
                    key: face_key(face.thing, face.face),
                    thing: face.thing,
                    face: face.face,
                    style,
                })
            })
            .collect();

        let mut patches = Vec::new();
        let mut next = BTreeMap::new();
        for el in &elements {
            match self.nodes.remove(&el.key) {
                None => patches.push(DomPatch::Create(el.clone())),
                Some(prev) if prev != el.style => patches.push(DomPatch::Update(el.clone())),
                Some(_) => {}
            }
            next.insert(el.key.clone(), el.style.clone());
        }
        // Whatever was not matched this frame has left the view.
        for key in std::mem::replace(&mut self.nodes, next).into_keys() {
            patches.push(DomPatch::Remove { key });
        }
        tracing::debug!(
            elements = elements.len(),
            patches = patches.len(),
            "dom frame rendered"
        );

        Ok(DomFrame {
            viewport: self.viewport,
            elements,
            patches,
            stylesheet: self.stylesheet(),
        })
    }
}
