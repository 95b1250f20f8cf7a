use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::simulation::{CommandOutbox, LanderState};

#[derive(Resource, Default)]
pub struct HudState {
    pub fuel_text: String,
    pub restart_visible: bool,
}

pub fn hud_system(
    mut contexts: EguiContexts,
    hud: Res<HudState>,
    lander: Res<LanderState>,
    mut outbox: ResMut<CommandOutbox>,
) {
    let ctx = contexts.ctx_mut();

    egui::Area::new(egui::Id::new("fuel"))
        .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(&hud.fuel_text)
                    .size(22.0)
                    .color(egui::Color32::WHITE),
            );
        });

    if !hud.restart_visible {
        return;
    }

    egui::Window::new("restart")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if ui
                .button(egui::RichText::new("Restart").size(22.0))
                .clicked()
            {
                lander.restart(&mut outbox);
            }
        });
}
