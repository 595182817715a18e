use eframe::egui;
use shared::{domain::Character, paging::PageItem};

pub const CARD_WIDTH: f32 = 180.0;
const PORTRAIT_EDGE: f32 = CARD_WIDTH - 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNavigation {
    Previous,
    Next,
    Page(u32),
}

/// Previous, the page buttons in `items`, then Next. Disabled controls are
/// rendered but never report a click. A click on the active page is reported
/// too; the pane decides whether it means a reload.
pub fn pagination_bar(
    ui: &mut egui::Ui,
    items: &[PageItem],
    prev_enabled: bool,
    next_enabled: bool,
) -> Option<PageNavigation> {
    let mut clicked = None;
    ui.horizontal_wrapped(|ui| {
        if ui
            .add_enabled(prev_enabled, egui::Button::new("Previous"))
            .clicked()
        {
            clicked = Some(PageNavigation::Previous);
        }

        for item in items {
            match *item {
                PageItem::Page { number, active } => {
                    let response = ui.selectable_label(active, number.to_string());
                    if response.clicked() {
                        clicked = Some(PageNavigation::Page(number));
                    }
                }
                PageItem::Ellipsis => {
                    ui.add_enabled(false, egui::Button::new("…"));
                }
            }
        }

        if ui
            .add_enabled(next_enabled, egui::Button::new("Next"))
            .clicked()
        {
            clicked = Some(PageNavigation::Next);
        }
    });
    clicked
}

pub enum PortraitView {
    Loading,
    Ready(egui::TextureHandle),
    Unavailable,
}

pub fn character_card(ui: &mut egui::Ui, character: &Character, portrait: PortraitView) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(CARD_WIDTH);
        ui.vertical_centered(|ui| {
            let size = egui::vec2(PORTRAIT_EDGE, PORTRAIT_EDGE);
            match portrait {
                PortraitView::Ready(texture) => {
                    ui.add(egui::Image::new(&texture).fit_to_exact_size(size));
                }
                PortraitView::Loading => {
                    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                    ui.painter()
                        .rect_filled(rect, 4.0, ui.visuals().faint_bg_color);
                    ui.put(rect, egui::Spinner::new());
                }
                PortraitView::Unavailable => {
                    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                    ui.painter()
                        .rect_filled(rect, 4.0, ui.visuals().faint_bg_color);
                    ui.put(rect, egui::Label::new(egui::RichText::new("No image").weak()));
                }
            }

            ui.add_space(4.0);
            ui.label(egui::RichText::new(&character.name).strong());
            let details: Vec<&str> = [character.status.as_str(), character.species.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect();
            if !details.is_empty() {
                ui.small(egui::RichText::new(details.join(" · ")).weak());
            }
        });
    });
}
