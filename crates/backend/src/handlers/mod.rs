pub mod a001_product;
pub mod d001_sales;
