pub mod product_queries;
