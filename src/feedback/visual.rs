//! Hit flash and animator bookkeeping.

use bevy::prelude::*;

use super::components::{AnimatorParams, HitFlash};
use crate::core::AnimationTrigger;

const FLASH_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Tint sprites while their flash runs, then restore and drop the flash.
pub fn tick_hit_flash(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut HitFlash, Option<&mut Sprite>)>,
) {
    for (entity, mut flash, sprite) in query.iter_mut() {
        flash.0.tick(time.delta());

        let finished = flash.0.finished();
        if let Some(mut sprite) = sprite {
            sprite.color = if finished { Color::WHITE } else { FLASH_COLOR };
        }
        if finished {
            commands.entity(entity).remove::<HitFlash>();
        }
    }
}

/// Mirror one-shot triggers onto the animator parameters.
pub fn record_animation_triggers(
    mut triggers: EventReader<AnimationTrigger>,
    mut params: Query<&mut AnimatorParams>,
) {
    for trigger in triggers.read() {
        match params.get_mut(trigger.entity) {
            Ok(mut params) => params.last_trigger = Some(trigger.name),
            Err(_) => debug!("Animation trigger '{}' for entity without animator", trigger.name),
        }
    }
}
