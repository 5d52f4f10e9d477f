use darling::{ast, FromDeriveInput, FromField, FromMeta};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, Default, FromMeta)]
struct ModelArgs {
	#[darling(default)]
	create: bool,
}

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

fn is_skipped(attrs: &[syn::Attribute]) -> bool {
	attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
		})
	})
}

pub fn from_input(
	args: proc_macro::TokenStream,
	input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match ModelArgs::from_list(&args) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let attrs = &receiver.attrs;

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(ident, "#[model] only supports structs")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter(|field| !is_skipped(&field.attrs))
		.filter_map(|field| Some((&field.attrs, field.ident.as_ref()?, &field.ty, &field.vis)))
		.collect::<Vec<_>>();

	let create = args.create.then(|| {
		let create_ident = format_ident!("Create{}Input", ident);
		let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
			quote! {
				#(#attrs)*
				#vis #ident: #ty,
			}
		});

		quote! {
			#(#attrs)*
			#vis struct #create_ident #generics {
				#(
					#create_fields
				)*
			}
		}
	});

	quote! {
		#input

		#create
	}
	.into()
}
