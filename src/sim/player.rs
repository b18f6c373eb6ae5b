//! Player body, vertical integration and the jump state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Result of a jump request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Primary,
    Double,
}

/// The player's kinematic body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive is down)
    pub vy: f32,
    pub on_ground: bool,
    /// Armed by a primary jump, consumed by a double jump or landing
    pub double_jump: bool,
    /// Host time (seconds) of the last accepted jump
    pub last_jump: Option<f64>,
}

impl Player {
    /// Standing on a surface whose top is `ground_y`
    pub fn standing_on(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground_y - PLAYER_SIZE),
            size: Vec2::splat(PLAYER_SIZE),
            vy: 0.0,
            on_ground: true,
            double_jump: false,
            last_jump: None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Apply gravity and move. While rising only part of the gravity
    /// increment is applied, which rounds off the apex without touching
    /// the descent.
    pub fn integrate(&mut self, dt: f32) {
        let before = self.vy;
        let mut vy = before + GRAVITY * dt;
        if before < 0.0 {
            vy = before + (vy - before) * APEX_DAMPING;
        }
        self.vy = vy;
        self.pos.y += self.vy * dt;
        self.on_ground = false;
    }

    /// Snap onto a surface top
    pub fn land(&mut self, top: f32) {
        self.pos.y = top - self.size.y;
        self.vy = 0.0;
        self.on_ground = true;
        self.double_jump = false;
    }

    /// Handle a jump press at host time `now` (seconds)
    pub fn try_jump(&mut self, now: f64) -> Option<JumpKind> {
        let buffered = self
            .last_jump
            .is_some_and(|last| now - last < JUMP_BUFFER);
        if self.on_ground || buffered {
            self.vy = JUMP_VELOCITY;
            self.on_ground = false;
            self.double_jump = true;
            self.last_jump = Some(now);
            Some(JumpKind::Primary)
        } else if self.double_jump {
            self.vy = JUMP_VELOCITY * DOUBLE_JUMP_FACTOR;
            self.on_ground = false;
            self.double_jump = false;
            self.last_jump = Some(now);
            Some(JumpKind::Double)
        } else {
            None
        }
    }

    /// Vertical squash/stretch: > 1 rising, < 1 falling
    pub fn stretch(&self) -> f32 {
        (1.0 - self.vy / 1600.0).clamp(0.78, 1.25)
    }
}
