mod image;
mod sparse;
