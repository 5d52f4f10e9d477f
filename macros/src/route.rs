use darling::{ast, FromMeta};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
	#[darling(multiple)]
	response: Vec<ResponseArgs>,
}

#[derive(FromMeta)]
struct ResponseArgs {
	status: syn::LitInt,
	shape: Option<syn::Type>,
	description: Option<String>,
}

pub fn from_input(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match RouteArgs::from_list(&args) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let function = syn::parse_macro_input!(input as syn::ItemFn);
	let Some((summary, description)) = extract_doc_comment(&function.attrs) else {
		return syn::Error::new_spanned(
			&function.sig.ident,
			"#[route] requires a doc comment with at least a summary line",
		)
		.into_compile_error()
		.into();
	};

	let fn_name = format_ident!("{}_docs", function.sig.ident);
	let fn_vis = &function.vis;

	let description = description.map(|description| quote!(.description(#description)));
	let tags = args.tag.iter();
	let responses = args.response.into_iter().map(|response| {
		let status = response.status;
		let shape = response.shape.map_or_else(|| quote!(()), |x| quote!(#x));

		if let Some(description) = response.description {
			quote! {
				.response_with::<#status, #shape, _>(|res| res.description(#description))
			}
		} else {
			quote! {
				.response::<#status, #shape>()
			}
		}
	});

	quote! {
		#function

		#fn_vis fn #fn_name(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary)
				#description
				#(
					.tag(#tags)
				)*
				#(
					#responses
				)*
		}
	}
	.into()
}

/// Splits the doc comment into a one-line summary and an optional description.
fn extract_doc_comment(attrs: &[syn::Attribute]) -> Option<(String, Option<String>)> {
	let mut doc_lines = String::new();

	for attr in attrs {
		let syn::Meta::NameValue(doc_attr) = &attr.meta else {
			continue;
		};

		if !doc_attr.path.is_ident("doc") {
			continue;
		}

		if let syn::Expr::Lit(syn::ExprLit {
			lit: syn::Lit::Str(literal),
			..
		}) = &doc_attr.value
		{
			// Trim lines like rustdoc does
			doc_lines += literal.value().trim();
			doc_lines += "\n";
		}
	}

	let doc_lines = doc_lines.trim().replace("\\\n", "");
	let mut paragraphs = doc_lines.splitn(2, '\n').filter(|x| !x.is_empty());

	let summary = paragraphs.next()?.to_owned();
	let description = paragraphs
		.next()
		.map(|x| x.replace('\n', " "))
		.filter(|x| !x.trim().is_empty());

	Some((summary, description))
}
