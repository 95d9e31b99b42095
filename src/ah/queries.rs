//! GraphQL documents sent to the Albert Heijn API.

pub const SEARCH_PRODUCTS: &str = r#"
query SearchProducts($input: SearchProductsInput!) {
    searchProducts(input: $input) {
        totalFound
        products {
            id
            title
            brand
            priceV2 {
                now {
                    amount
                    formattedV2
                }
                was {
                    amount
                    formattedV2
                }
            }
            listPrice {
                amount
                currency
            }
            images {
                url
            }
        }
    }
}
"#;

pub const PRODUCT: &str = r#"
query Product($id: Int!) {
    product(id: $id) {
        id
        title
        brand
        summary
        priceV2 {
            now {
                amount
                formattedV2
            }
            was {
                amount
                formattedV2
            }
        }
        listPrice {
            amount
            currency
        }
        images {
            url
        }
    }
}
"#;
