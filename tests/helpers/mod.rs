pub mod part_builder;
