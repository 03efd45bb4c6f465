// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only access to the host document's layer and room structure.
//!
//! The kernel never owns document state. Queries that need it take a
//! [`DocumentContext`] argument supplied by the host.

use serde::{Deserialize, Serialize};

use crate::arena::{FaceKind, TopologyArena};
use crate::keys::FaceKey;

/// Identifier of a document layer (storey).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u64);

/// Room-level facts the host keeps about a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomInfo {
    pub ceiling_face: Option<FaceKey>,
}

/// Host-side lookups used to locate a face's owning floor.
pub trait DocumentContext {
    /// Returns the layer the face is placed on.
    fn entity_layer(&self, face: FaceKey) -> Option<LayerId>;

    /// Calls `f` for every floor face on `layer`.
    fn for_each_floor(&self, layer: LayerId, f: &mut dyn FnMut(FaceKey));

    /// Returns the room information recorded for a floor.
    fn face_room_info(&self, floor: FaceKey) -> Option<RoomInfo>;
}

impl TopologyArena {
    /// Finds the floor that owns `face`.
    ///
    /// A floor owns itself. A ceiling answers from its `host_floor` when set;
    /// otherwise the floors on the ceiling's layer are scanned for the one
    /// whose room names this ceiling.
    pub fn owning_floor(&self, ctx: &dyn DocumentContext, face: FaceKey) -> Option<FaceKey> {
        match self.faces.get(face)?.kind {
            FaceKind::Floor => Some(face),
            FaceKind::Ceiling {
                host_floor: Some(floor),
            } => Some(floor),
            FaceKind::Ceiling { host_floor: None } => {
                let layer = ctx.entity_layer(face)?;
                let mut owner = None;
                ctx.for_each_floor(layer, &mut |floor| {
                    if owner.is_none()
                        && ctx.face_room_info(floor).and_then(|info| info.ceiling_face) == Some(face)
                    {
                        owner = Some(floor);
                    }
                });
                owner
            }
        }
    }

    /// Records the floor a ceiling belongs to. No effect on floors.
    pub fn set_host_floor(&mut self, ceiling: FaceKey, floor: Option<FaceKey>) -> bool {
        match self.faces.get_mut(ceiling) {
            Some(data) => match &mut data.kind {
                FaceKind::Ceiling { host_floor } => {
                    *host_floor = floor;
                    true
                }
                FaceKind::Floor => false,
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divide::LoopPoint;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct MockDocument {
        layers: FxHashMap<FaceKey, LayerId>,
        floors: Vec<(LayerId, FaceKey)>,
        rooms: FxHashMap<FaceKey, RoomInfo>,
    }

    impl DocumentContext for MockDocument {
        fn entity_layer(&self, face: FaceKey) -> Option<LayerId> {
            self.layers.get(&face).copied()
        }

        fn for_each_floor(&self, layer: LayerId, f: &mut dyn FnMut(FaceKey)) {
            for &(l, floor) in &self.floors {
                if l == layer {
                    f(floor);
                }
            }
        }

        fn face_room_info(&self, floor: FaceKey) -> Option<RoomInfo> {
            self.rooms.get(&floor).copied()
        }
    }

    fn square(arena: &mut TopologyArena, x0: f64, kind: FaceKind) -> FaceKey {
        let points = vec![
            LoopPoint::new(x0, 0.0),
            LoopPoint::new(x0 + 1.0, 0.0),
            LoopPoint::new(x0 + 1.0, 1.0),
            LoopPoint::new(x0, 1.0),
        ];
        arena.divide_face(&points, &[], kind)[0]
    }

    #[test]
    fn floor_owns_itself() {
        let mut arena = TopologyArena::new();
        let floor = square(&mut arena, 0.0, FaceKind::Floor);
        assert_eq!(arena.owning_floor(&MockDocument::default(), floor), Some(floor));
    }

    #[test]
    fn ceiling_found_through_room_info() {
        let mut arena = TopologyArena::new();
        let other = square(&mut arena, 0.0, FaceKind::Floor);
        let floor = square(&mut arena, 2.0, FaceKind::Floor);
        let ceiling = square(&mut arena, 2.0, FaceKind::Ceiling { host_floor: None });

        let mut doc = MockDocument::default();
        doc.layers.insert(ceiling, LayerId(1));
        doc.floors.push((LayerId(1), other));
        doc.floors.push((LayerId(1), floor));
        doc.rooms.insert(other, RoomInfo::default());
        doc.rooms.insert(
            floor,
            RoomInfo {
                ceiling_face: Some(ceiling),
            },
        );

        assert_eq!(arena.owning_floor(&doc, ceiling), Some(floor));
    }

    #[test]
    fn ceiling_without_layer_has_no_owner() {
        let mut arena = TopologyArena::new();
        let ceiling = square(&mut arena, 0.0, FaceKind::Ceiling { host_floor: None });
        assert_eq!(arena.owning_floor(&MockDocument::default(), ceiling), None);
    }

    #[test]
    fn host_floor_short_circuits_lookup() {
        let mut arena = TopologyArena::new();
        let floor = square(&mut arena, 0.0, FaceKind::Floor);
        let ceiling = square(&mut arena, 0.0, FaceKind::Ceiling { host_floor: None });

        assert!(arena.set_host_floor(ceiling, Some(floor)));
        assert!(!arena.set_host_floor(floor, Some(ceiling)));
        assert_eq!(arena.owning_floor(&MockDocument::default(), ceiling), Some(floor));
    }
}
