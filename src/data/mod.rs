/// Data layer: items, generation, and the stage scoring functions.
///
/// Architecture:
/// ```text
///   seed, item_count
///        │
///        ▼
///   ┌───────────┐
///   │ generator │  ChaCha8 → Dataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  Vec<Item>, positional identity
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  FilterKind score + threshold → Partition
///   └──────────┘
/// ```

pub mod filter;
pub mod generator;
pub mod model;
