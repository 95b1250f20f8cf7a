use bevy::audio::AudioSinkPlayback;
use bevy::prelude::*;

use crate::visualization::LevelSpecific;

const THRUSTER_SOUND: &str = "sounds/thruster.ogg";

#[derive(Component)]
pub struct ThrusterSound;

/// Whether the thruster loop should currently be audible.
#[derive(Resource, Default)]
pub struct ThrusterAudio {
    pub playing: bool,
}

/// Spawns the looping thruster cue, paused until a thruster fires.
pub fn spawn_thruster_sound(commands: &mut Commands, asset_server: &AssetServer) {
    commands.spawn((
        AudioPlayer::new(asset_server.load(THRUSTER_SOUND)),
        PlaybackSettings {
            paused: true,
            ..PlaybackSettings::LOOP
        },
        ThrusterSound,
        LevelSpecific,
    ));
}

// Resumes from wherever the loop was paused. Runs every frame so a sink that
// finishes loading late still picks up the current state.
pub fn sync_thruster_audio(audio: Res<ThrusterAudio>, sinks: Query<&AudioSink, With<ThrusterSound>>) {
    for sink in sinks.iter() {
        match (audio.playing, sink.is_paused()) {
            (true, true) => sink.play(),
            (false, false) => sink.pause(),
            _ => {}
        }
    }
}
