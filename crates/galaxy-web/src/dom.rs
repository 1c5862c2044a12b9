//! DOM overlay labels and container styling.

use galaxy_engine::{BodyId, DeviceTier, LabelPlacement, LabelSink, LabelSpec};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

/// Inline styles for a freshly created label.
pub fn label_base_style(spec: &LabelSpec, mobile: bool) -> Vec<(&'static str, String)> {
    let color = spec.color.to_hex_string();
    vec![
        ("position", "absolute".into()),
        ("left", "0px".into()),
        ("top", "0px".into()),
        ("display", "none".into()),
        ("pointer-events", "auto".into()),
        ("cursor", "pointer".into()),
        ("padding", if mobile { "4px 8px" } else { "2px 6px" }.into()),
        ("border-radius", "6px".into()),
        ("font-size", if mobile { "14px" } else { "12px" }.into()),
        ("font-weight", "600".into()),
        ("background", "rgba(0,0,0,0.5)".into()),
        ("border", format!("1px solid {color}66")),
        ("color", color),
        ("user-select", "none".into()),
        ("transform", "translate(-50%, -150%)".into()),
        ("z-index", "10".into()),
    ]
}

/// Style writes for one placement. Hidden labels keep their last position.
pub fn placement_style(placement: &LabelPlacement) -> [(&'static str, String); 3] {
    [
        ("left", format!("{}px", placement.x)),
        ("top", format!("{}px", placement.y)),
        ("display", if placement.visible { "block" } else { "none" }.into()),
    ]
}

/// Container styles: no browser touch gestures, tier-dependent minimum height.
pub fn container_style(tier: DeviceTier) -> [(&'static str, &'static str); 3] {
    let min_height = match tier {
        DeviceTier::Mobile => "400px",
        DeviceTier::Tablet => "500px",
        DeviceTier::Desktop => "600px",
    };
    [("position", "relative"), ("touch-action", "none"), ("min-height", min_height)]
}

pub fn apply_style<'a>(
    element: &HtmlElement,
    styles: impl IntoIterator<Item = (&'a str, impl AsRef<str>)>,
) -> Result<(), JsValue> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value.as_ref())?;
    }
    Ok(())
}

/// The body labels, appended to the container.
pub struct DomLabels {
    elements: Vec<(BodyId, HtmlElement)>,
}

impl DomLabels {
    pub fn create(
        document: &Document,
        container: &HtmlElement,
        specs: &[LabelSpec],
        mobile: bool,
    ) -> Result<Self, JsValue> {
        let mut elements = Vec::with_capacity(specs.len());
        for spec in specs {
            let element: HtmlElement = document.create_element("div")?.dyn_into()?;
            element.set_text_content(Some(spec.text));
            element.set_attribute("data-body", spec.body.tag())?;
            apply_style(&element, label_base_style(spec, mobile))?;
            container.append_child(&element)?;
            elements.push((spec.body, element));
        }
        Ok(Self { elements })
    }

    pub fn element(&self, body: BodyId) -> Option<&HtmlElement> {
        self.elements.iter().find(|(b, _)| *b == body).map(|(_, el)| el)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(BodyId, HtmlElement)> {
        self.elements.iter()
    }

    /// Detach every label. Labels already gone from the DOM are skipped.
    pub fn remove_all(&mut self) {
        for (_, element) in self.elements.drain(..) {
            if element.parent_node().is_some() {
                element.remove();
            }
        }
    }
}

impl LabelSink for DomLabels {
    fn place(&mut self, body: BodyId, placement: LabelPlacement) {
        let Some(element) = self.element(body) else { return };
        if let Err(err) = apply_style(element, placement_style(&placement)) {
            log::warn!("label style write failed for {}: {:?}", body.tag(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_engine::LABELS;

    fn lookup<'a>(styles: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        styles.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn mobile_labels_are_larger() {
        let star = &LABELS[0];
        let mobile = label_base_style(star, true);
        let desktop = label_base_style(star, false);
        assert_eq!(lookup(&mobile, "font-size"), Some("14px"));
        assert_eq!(lookup(&mobile, "padding"), Some("4px 8px"));
        assert_eq!(lookup(&desktop, "font-size"), Some("12px"));
        assert_eq!(lookup(&desktop, "padding"), Some("2px 6px"));
    }

    #[test]
    fn border_is_translucent_label_color() {
        let styles = label_base_style(&LABELS[1], false);
        assert_eq!(lookup(&styles, "color"), Some("#22c55e"));
        assert_eq!(lookup(&styles, "border"), Some("1px solid #22c55e66"));
        assert_eq!(lookup(&styles, "transform"), Some("translate(-50%, -150%)"));
    }

    #[test]
    fn placement_writes_position_and_display() {
        let shown = placement_style(&LabelPlacement { x: 120.5, y: 40.0, visible: true });
        assert_eq!(shown[0], ("left", "120.5px".to_string()));
        assert_eq!(shown[1], ("top", "40px".to_string()));
        assert_eq!(shown[2], ("display", "block".to_string()));
        let hidden = placement_style(&LabelPlacement::HIDDEN);
        assert_eq!(hidden[2].1, "none");
    }

    #[test]
    fn container_min_height_follows_tier() {
        assert_eq!(container_style(DeviceTier::Mobile)[2], ("min-height", "400px"));
        assert_eq!(container_style(DeviceTier::Desktop)[2], ("min-height", "600px"));
    }
}
